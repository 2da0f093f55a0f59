use solver_rs::{Settings, Solver, ABORTED};

use clap::Parser;
use std::io::Write;

/// Solves arithmetic expressions and `name = expression` declarations.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Deepest bracket nesting allowed in an expression.
    #[arg(long, default_value_t = Settings::default().max_depth)]
    max_depth: usize,

    /// Decimal places shown for results that are not integers.
    #[arg(short, long, default_value_t = Settings::default().places)]
    places: usize,

    /// Do not print the welcome banner.
    #[arg(short, long)]
    quiet: bool,

    /// Exit after solving the given expressions instead of prompting.
    #[arg(short, long)]
    batch: bool,

    /// Expressions solved in order before the prompt opens.
    expressions: Vec<String>,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn report(solver: &mut Solver, line: &str) {
    match solver.solve(line) {
        Ok(outcome) => println!("{outcome}"),
        Err(e) => {
            eprintln!("Error, {}", e.diagnostic());
            println!("{ABORTED}");
        },
    }
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut solver = Solver::with_settings(Settings{max_depth: args.max_depth, places: args.places});

    for expression in &args.expressions {
        report(&mut solver, expression);
    }
    if args.batch {
        return Ok(());
    }

    if !args.quiet {
        println!("Type an expression or a declaration such as `x = 2 * pi`.");
        println!("Enter `quit` to leave.");
    }

    prompt()?;
    for line in std::io::stdin().lines() {
        let line = line?;
        let command = line.trim();

        if command == "quit" || command == "exit" {
            break;
        }
        if !command.is_empty() {
            report(&mut solver, command);
        }
        prompt()?;
    }
    Ok(())
}

use crate::error_handling::*;
use crate::evaluating::evaluate;
use crate::scanning::*;
use crate::tables::Tables;
use crate::value::{Value, DEFAULT_PLACES};

use std::fmt;

/// Printed in place of a result whenever a calculation fails.
pub const ABORTED: &str = "Calculation aborted.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Deepest bracket nesting the evaluator will recurse into.
    pub max_depth: usize,
    /// Decimal places shown for values that are not integers.
    pub places: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self{max_depth: 64, places: DEFAULT_PLACES}
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    answer,
    variable(String),
}

/// A successful calculation and where its value was stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub target: Target,
    pub value: Value,
    places: usize,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.value.render(self.places);
        match &self.target {
            Target::answer => write!(f, "Ans = {rendered}"),
            Target::variable(name) => write!(f, "{name} = {rendered}"),
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut characters = name.chars();
    characters.next().is_some_and(|c| c.is_ascii_alphabetic())
        && characters.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits `name=expression`. Plain expressions come back with no name.
fn split_declaration(input: &str) -> Result<(Option<&str>, &str)> {
    let Some((name, expression)) = input.split_once('=') else {
        return Ok((None, input));
    };
    if expression.contains('=') {
        return Err(CalcError::too_many_equals);
    }
    if !is_valid_name(name) {
        return Err(CalcError::invalid_name(name.into()));
    }
    Ok((Some(name), expression))
}

/// One calculator session: its name tables and settings.
pub struct Solver {
    tables: Tables,
    settings: Settings,
}

impl Solver {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self{tables: Tables::new(), settings}
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut Tables {
        &mut self.tables
    }

    /// Evaluates one line of input and stores the result, either in `ans`
    /// or in the declared variable. Tables are untouched when this fails.
    pub fn solve(&mut self, input: &str) -> Result<Outcome> {
        let input = discard_spaces(input);
        let (name, expression) = split_declaration(&input)?;
        if expression.is_empty() {
            return Err(CalcError::empty_expression);
        }

        let source = rewrite_negatives(expression);
        let blocks = group(&source, &self.tables)?;
        let value = evaluate(&source, &blocks, &self.tables, self.settings.max_depth)?;

        let target = match name {
            Some(name) => {
                self.tables.declare(name, value)?;
                Target::variable(name.into())
            },
            None => {
                self.tables.set_answer(value);
                Target::answer
            },
        };
        tracing::debug!(?target, %value, "solved {input}");
        Ok(Outcome{target, value, places: self.settings.places})
    }

    /// Like [`Solver::solve`], but renders the result for display. Failures
    /// collapse to [`ABORTED`]; the cause is logged.
    pub fn process(&mut self, input: &str) -> String {
        match self.solve(input) {
            Ok(outcome) => outcome.to_string(),
            Err(error) => {
                tracing::debug!(kind = %error.kind(), "{error}");
                ABORTED.into()
            },
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

//! An interactive arithmetic expression solver.
//!
//! Expressions are split into a flat sequence of blocks, each carrying its
//! bracket depth, and evaluated right to left with a value stack and an
//! operator stack. Numbers stay exact fractions until an operation needs a
//! decimal.

#![allow(nonstandard_style)]

pub mod error_handling;
pub mod evaluating;
pub mod scanning;
pub mod solving;
pub mod tables;
pub mod value;

pub use error_handling::{CalcError, ErrorKind, Result};
pub use solving::{Outcome, Settings, Solver, Target, ABORTED};
pub use value::{Fraction, Value};

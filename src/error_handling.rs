use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    syntax,
    recognition,
    domain,
    access,
    structural,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;
        let name = match self {
            syntax => "syntax error",
            recognition => "recognition error",
            domain => "arithmetic error",
            access => "bad access",
            structural => "invalid expression",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid character, '{0}', encountered")]
    invalid_character(char),

    #[error("'{0}' is not a valid number")]
    invalid_number(String),

    #[error("too many '=' in declaration")]
    too_many_equals,

    #[error("'{0}' is not a valid variable name")]
    invalid_name(String),

    #[error("brackets are not paired")]
    unpaired_brackets,

    #[error("function '{0}' must be followed by a bracketed argument")]
    missing_argument(String),

    #[error("expression is empty")]
    empty_expression,

    #[error("identifier, '{0}', is not defined")]
    undefined(String),

    #[error("cannot apply '{0}' to {1}")]
    out_of_domain(String, String),

    #[error("the '{0}' operation has no defined result")]
    undefined_result(String),

    #[error("'{0}' has no value yet")]
    not_yet_defined(String),

    #[error("'{0}' is reserved and cannot be declared")]
    reserved_name(String),

    #[error("operators and operands do not line up")]
    misplaced_operator,

    #[error("brackets are nested deeper than {0} levels")]
    too_deep(usize),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        use CalcError::*;
        match self {
            invalid_character(_)
            | invalid_number(_)
            | too_many_equals
            | invalid_name(_)
            | unpaired_brackets
            | missing_argument(_)
            | empty_expression => ErrorKind::syntax,
            undefined(_) => ErrorKind::recognition,
            out_of_domain(..) | undefined_result(_) => ErrorKind::domain,
            not_yet_defined(_) | reserved_name(_) => ErrorKind::access,
            misplaced_operator | too_deep(_) => ErrorKind::structural,
        }
    }

    /// The message shown on the diagnostic channel, e.g.
    /// `syntax error: brackets are not paired`.
    pub fn diagnostic(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

use crate::error_handling::*;
use crate::scanning::BlockKind;
use crate::value::Value;

use std::collections::HashMap;

/// The constant overwritten after every successful plain evaluation.
pub const ANSWER: &str = "ans";

fn anywhere(_: f64) -> bool {
    true
}

fn non_negative(argument: f64) -> bool {
    argument >= 0.0
}

fn positive(argument: f64) -> bool {
    argument > 0.0
}

/// A unary function over the decimal projection of its argument.
#[derive(Clone, Copy)]
pub struct Function {
    pub action: fn(f64) -> f64,
    pub accepts: fn(f64) -> bool,
}

impl Function {
    pub fn new(action: fn(f64) -> f64) -> Self {
        Self{action, accepts: anywhere}
    }

    pub fn restricted(action: fn(f64) -> f64, accepts: fn(f64) -> bool) -> Self {
        Self{action, accepts}
    }
}

/// Session-wide names. Lookups go functions, then constants, then variables.
pub struct Tables {
    functions: HashMap<String, Function>,
    constants: HashMap<String, Value>,
    variables: HashMap<String, Value>,
}

impl Tables {
    pub fn empty() -> Self {
        Self{
            functions: HashMap::new(),
            constants: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    pub fn new() -> Self {
        let mut tables = Self::empty();

        tables.constants.insert("e".into(), Value::from(std::f64::consts::E));
        tables.constants.insert("pi".into(), Value::from(std::f64::consts::PI));
        tables.constants.insert(ANSWER.into(), Value::undefined);

        let functions = [
            ("sin", Function::new(f64::sin)),
            ("cos", Function::new(f64::cos)),
            ("tan", Function::new(f64::tan)),
            ("exp", Function::new(f64::exp)),
            ("sqrt", Function::restricted(f64::sqrt, non_negative)),
            ("floor", Function::new(f64::floor)),
            ("ln", Function::restricted(f64::ln, positive)),
            ("log", Function::restricted(f64::log10, positive)),
        ];
        for (name, function) in functions {
            tables.functions.insert(name.into(), function);
        }
        tables
    }

    pub fn resolve(&self, name: &str) -> Result<BlockKind> {
        if self.functions.contains_key(name) {
            Ok(BlockKind::function)
        } else if self.constants.contains_key(name) {
            Ok(BlockKind::constant)
        } else if self.variables.contains_key(name) {
            Ok(BlockKind::variable)
        } else {
            Err(CalcError::undefined(name.into()))
        }
    }

    pub fn function(&self, name: &str) -> Option<Function> {
        self.functions.get(name).copied()
    }

    pub fn constant(&self, name: &str) -> Option<Value> {
        self.constants.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> Option<Value> {
        self.variables.get(name).copied()
    }

    /// Names a declaration may not take.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.constants.contains_key(name)
    }

    pub fn set_answer(&mut self, value: Value) {
        self.constants.insert(ANSWER.into(), value);
    }

    pub fn declare(&mut self, name: &str, value: Value) -> Result<()> {
        if self.is_reserved(name) {
            return Err(CalcError::reserved_name(name.into()));
        }
        self.variables.insert(name.into(), value);
        Ok(())
    }

    pub fn define_function(&mut self, name: &str, function: Function) {
        self.functions.insert(name.into(), function);
    }

    pub fn define_constant(&mut self, name: &str, value: Value) {
        self.constants.insert(name.into(), value);
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolution_order() {
        let mut tables = Tables::new();
        tables.declare("x", Value::from(1)).unwrap();
        tables.define_constant("twice", Value::from(2));
        tables.define_function("twice", Function::new(|x| x * 2.0));

        assert_eq!(tables.resolve("sin"), Ok(BlockKind::function));
        assert_eq!(tables.resolve("twice"), Ok(BlockKind::function));
        assert_eq!(tables.resolve("pi"), Ok(BlockKind::constant));
        assert_eq!(tables.resolve("x"), Ok(BlockKind::variable));
        assert_eq!(tables.resolve("y"), Err(CalcError::undefined("y".into())));
    }

    #[test]
    fn answer_starts_undefined() {
        let tables = Tables::new();
        assert_eq!(tables.constant(ANSWER), Some(Value::undefined));
    }

    #[test]
    fn reserved_names_cannot_be_declared() {
        let mut tables = Tables::new();
        assert_eq!(
            tables.declare("pi", Value::from(1)),
            Err(CalcError::reserved_name("pi".into()))
        );
        assert_eq!(
            tables.declare("sqrt", Value::from(1)),
            Err(CalcError::reserved_name("sqrt".into()))
        );
        assert_eq!(tables.constant("pi"), Some(Value::from(std::f64::consts::PI)));
    }

    #[test]
    fn redeclaration_overwrites() {
        let mut tables = Tables::new();
        tables.declare("x", Value::from(1)).unwrap();
        tables.declare("x", Value::from(2)).unwrap();
        assert_eq!(tables.variable("x"), Some(Value::from(2)));
    }

    #[test]
    fn sqrt_rejects_negatives() {
        let sqrt = Tables::new().function("sqrt").unwrap();
        assert!((sqrt.accepts)(0.0));
        assert!(!(sqrt.accepts)(-1.0));
    }
}

use crate::error_handling::*;
use crate::scanning::{Block, BlockKind};
use crate::tables::Tables;
use crate::value::Value;

use std::ops::Range;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    addition,
    subtraction,
    multiplication,
    division,
    exponentiation,
}

impl BinaryOperator {
    pub fn call(&self, left: Value, right: Value) -> Value {
        use BinaryOperator::*;

        match self {
            addition => left + right,
            subtraction => left - right,
            multiplication => left * right,
            division => left / right,
            exponentiation => left.pow(right),
        }
    }

    pub fn precedence(&self) -> i32 {
        use BinaryOperator::*;
        match self {
            addition | subtraction => 1,
            multiplication | division => 2,
            exponentiation => 3,
        }
    }

    pub fn symbol(&self) -> char {
        use BinaryOperator::*;
        match self {
            addition => '+',
            subtraction => '-',
            multiplication => '*',
            division => '/',
            exponentiation => '^',
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidOperator;

impl FromStr for BinaryOperator {
    type Err = InvalidOperator;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use BinaryOperator::*;
        match s {
            "+" => Ok(addition),
            "-" => Ok(subtraction),
            "*" => Ok(multiplication),
            "/" => Ok(division),
            "^" => Ok(exponentiation),
            _ => Err(InvalidOperator),
        }
    }
}

/// Value and operator stacks for one bracket level.
///
/// Blocks arrive right to left, so the most recently pushed value is always
/// the left operand.
#[derive(Default)]
struct Yard {
    values: Vec<Value>,
    operators: Vec<BinaryOperator>,
}

impl Yard {
    fn add_value(&mut self, value: Value) {
        self.values.push(value);
    }

    fn is_balanced(&self) -> bool {
        self.values.len() == self.operators.len() + 1
    }

    fn pop_higher_operator(&mut self, precedence: i32) -> Option<BinaryOperator> {
        if self.operators.last().filter(|operator| operator.precedence() > precedence).is_some() {
            self.operators.pop()
        } else {
            None
        }
    }

    fn apply(&mut self, operator: BinaryOperator) -> Result<()> {
        let left = self.values.pop().ok_or(CalcError::misplaced_operator)?;
        let right = self.values.pop().ok_or(CalcError::misplaced_operator)?;

        let result = operator.call(left, right);
        if !result.is_calculable() {
            return Err(CalcError::undefined_result(operator.symbol().to_string()));
        }
        self.values.push(result);
        Ok(())
    }

    /// Only strictly higher operators are reduced before the push, which
    /// makes chains of equal precedence apply left to right.
    fn add_operator(&mut self, operator: BinaryOperator) -> Result<()> {
        if !self.is_balanced() {
            return Err(CalcError::misplaced_operator);
        }
        while let Some(higher) = self.pop_higher_operator(operator.precedence()) {
            self.apply(higher)?;
        }
        self.operators.push(operator);
        Ok(())
    }

    fn finish(mut self) -> Result<Value> {
        if !self.is_balanced() {
            return Err(CalcError::misplaced_operator);
        }
        while let Some(operator) = self.operators.pop() {
            self.apply(operator)?;
        }
        match self.values.as_slice() {
            [value] => Ok(*value),
            _ => Err(CalcError::misplaced_operator),
        }
    }
}

/// Evaluates ranges of one flat block sequence, recursing into brackets.
pub struct Evaluator<'a> {
    source: &'a str,
    blocks: &'a [Block],
    tables: &'a Tables,
    max_depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(source: &'a str, blocks: &'a [Block], tables: &'a Tables, max_depth: usize) -> Self {
        Self{source, blocks, tables, max_depth}
    }

    pub fn evaluate_all(&self) -> Result<Value> {
        self.evaluate(0..self.blocks.len(), 0)
    }

    #[tracing::instrument(level = "trace", skip(self), err)]
    fn evaluate(&self, range: Range<usize>, depth: usize) -> Result<Value> {
        if depth > self.max_depth {
            return Err(CalcError::too_deep(self.max_depth));
        }

        let mut yard = Yard::default();
        let mut index = range.end;
        while index > range.start {
            index -= 1;
            let block = self.blocks[index];
            let text = block.text(self.source);

            match block.kind {
                BlockKind::number => {
                    let value = Value::from_literal(text);
                    if !value.is_calculable() {
                        return Err(CalcError::invalid_number(text.into()));
                    }
                    yard.add_value(value);
                },

                BlockKind::constant => yard.add_value(self.lookup(text, self.tables.constant(text))?),

                BlockKind::variable => yard.add_value(self.lookup(text, self.tables.variable(text))?),

                BlockKind::function => return Err(CalcError::missing_argument(text.into())),

                BlockKind::operator => {
                    let operator: BinaryOperator = text.parse().map_err(|_| CalcError::misplaced_operator)?;
                    yard.add_operator(operator)?;
                },

                BlockKind::close_bracket => {
                    let open = self.matching_open(index, range.start)?;
                    let inside = self.evaluate(open + 1..index, depth + 1)?;

                    let function = (open > range.start)
                        .then(|| self.blocks[open - 1])
                        .filter(|before| before.kind == BlockKind::function);
                    match function {
                        Some(name) => {
                            yard.add_value(self.call(name.text(self.source), inside)?);
                            index = open - 1;
                        },
                        None => {
                            yard.add_value(inside);
                            index = open;
                        },
                    }
                },

                BlockKind::open_bracket => return Err(CalcError::unpaired_brackets),
            }
        }
        yard.finish()
    }

    fn lookup(&self, name: &str, value: Option<Value>) -> Result<Value> {
        match value {
            Some(value) if value.is_calculable() => Ok(value),
            Some(_) => Err(CalcError::not_yet_defined(name.into())),
            None => Err(CalcError::undefined(name.into())),
        }
    }

    /// The nearest open bracket left of `close` on the same level, found by
    /// walking back through the flat sequence. Costs one step per block
    /// between the pair.
    fn matching_open(&self, close: usize, floor: usize) -> Result<usize> {
        let level = self.blocks[close].level;
        (floor..close)
            .rev()
            .find(|&index| {
                let block = self.blocks[index];
                block.kind == BlockKind::open_bracket && block.level == level
            })
            .ok_or(CalcError::unpaired_brackets)
    }

    fn call(&self, name: &str, argument: Value) -> Result<Value> {
        let function = self
            .tables
            .function(name)
            .ok_or_else(|| CalcError::undefined(name.into()))?;
        let decimal = argument
            .as_decimal()
            .ok_or_else(|| CalcError::undefined_result(name.into()))?;

        if !(function.accepts)(decimal) {
            return Err(CalcError::out_of_domain(name.into(), argument.to_string()));
        }
        let result = Value::from((function.action)(decimal));
        if !result.is_calculable() {
            return Err(CalcError::undefined_result(name.into()));
        }
        Ok(result)
    }
}

pub fn evaluate(source: &str, blocks: &[Block], tables: &Tables, max_depth: usize) -> Result<Value> {
    Evaluator::new(source, blocks, tables, max_depth).evaluate_all()
}

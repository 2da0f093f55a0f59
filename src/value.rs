use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Decimal places shown when a value is rendered through `Display`.
pub const DEFAULT_PLACES: usize = 10;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// A reduced rational number with a positive denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

impl Fraction {
    /// Builds a reduced fraction. `None` for a zero denominator, or when the
    /// sign cannot be normalized without overflowing `i64`.
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let divisor = i64::try_from(gcd(numerator.unsigned_abs(), denominator.unsigned_abs())).ok()?;
        let (mut numerator, mut denominator) = (numerator / divisor, denominator / divisor);
        if denominator < 0 {
            numerator = numerator.checked_neg()?;
            denominator = denominator.checked_neg()?;
        }
        Some(Self{numerator, denominator})
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        let left = self.numerator.checked_mul(other.denominator)?;
        let right = other.numerator.checked_mul(self.denominator)?;
        Self::new(left.checked_add(right)?, self.denominator.checked_mul(other.denominator)?)
    }

    fn checked_sub(self, other: Self) -> Option<Self> {
        self.checked_add(other.checked_neg()?)
    }

    fn checked_mul(self, other: Self) -> Option<Self> {
        Self::new(
            self.numerator.checked_mul(other.numerator)?,
            self.denominator.checked_mul(other.denominator)?,
        )
    }

    fn checked_div(self, other: Self) -> Option<Self> {
        Self::new(
            self.numerator.checked_mul(other.denominator)?,
            self.denominator.checked_mul(other.numerator)?,
        )
    }

    fn checked_neg(self) -> Option<Self> {
        Some(Self{numerator: self.numerator.checked_neg()?, denominator: self.denominator})
    }

    /// Only exact non-negative integer exponents stay exact.
    fn checked_pow(self, exponent: Self) -> Option<Self> {
        if !exponent.is_integer() {
            return None;
        }
        let exponent = u32::try_from(exponent.numerator).ok()?;
        Self::new(
            self.numerator.checked_pow(exponent)?,
            self.denominator.checked_pow(exponent)?,
        )
    }
}

/// A number that is either an exact fraction or a floating decimal.
///
/// `undefined` carries no number at all. It is what `ans` holds before the
/// first successful evaluation and what every arithmetic operation returns
/// when it has no result (division by zero, a non-finite decimal, or an
/// undefined operand). Operations never panic; callers check
/// [`Value::is_calculable`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Value {
    fraction(Fraction),
    decimal(f64),
    #[default]
    undefined,
}

impl Value {
    pub fn from_fraction(numerator: i64, denominator: i64) -> Self {
        match Fraction::new(numerator, denominator) {
            Some(fraction) => Value::fraction(fraction),
            None if denominator != 0 => Value::from(numerator as f64 / denominator as f64),
            None => Value::undefined,
        }
    }

    /// Reads a numeric literal made of digits and at most one `.`.
    ///
    /// Literals are exact: `2.25` becomes `9/4`. A literal too long for an
    /// exact `i64` fraction is read as a decimal instead.
    pub fn from_literal(text: &str) -> Self {
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Value::undefined;
        }
        let (whole, fractional) = match text.split_once('.') {
            Some((whole, fractional)) => (whole, fractional),
            None => (text, ""),
        };
        if fractional.contains('.') || (whole.is_empty() && fractional.is_empty()) {
            return Value::undefined;
        }

        let digits = format!("{whole}{fractional}");
        let exact = digits.parse::<i64>().ok().zip(
            u32::try_from(fractional.len()).ok().and_then(|places| 10i64.checked_pow(places)),
        );
        match exact {
            Some((numerator, denominator)) => Value::from_fraction(numerator, denominator),
            None => text.parse::<f64>().map_or(Value::undefined, Value::from),
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Value::fraction(_))
    }

    pub fn is_calculable(&self) -> bool {
        !matches!(self, Value::undefined)
    }

    pub fn as_fraction(&self) -> Option<Fraction> {
        match self {
            Value::fraction(fraction) => Some(*fraction),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::fraction(fraction) => Some(fraction.to_f64()),
            Value::decimal(decimal) => Some(*decimal),
            Value::undefined => None,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::fraction(fraction) => fraction.is_zero(),
            Value::decimal(decimal) => *decimal == 0.0,
            Value::undefined => false,
        }
    }

    /// Exact arithmetic when both sides are fractions and `exact` succeeds,
    /// decimal arithmetic on the projections otherwise.
    fn combine<E, A>(self, other: Self, exact: E, approximate: A) -> Self
    where
        E: FnOnce(Fraction, Fraction) -> Option<Fraction>,
        A: FnOnce(f64, f64) -> f64,
    {
        if let (Value::fraction(left), Value::fraction(right)) = (self, other) {
            if let Some(result) = exact(left, right) {
                return Value::fraction(result);
            }
        }
        match (self.as_decimal(), other.as_decimal()) {
            (Some(left), Some(right)) => Value::from(approximate(left, right)),
            _ => Value::undefined,
        }
    }

    pub fn pow(self, exponent: Self) -> Self {
        self.combine(exponent, Fraction::checked_pow, f64::powf)
    }

    /// Renders integers as integers and everything else as a decimal with at
    /// most `places` decimals, trailing zeros trimmed.
    pub fn render(&self, places: usize) -> String {
        match self {
            Value::fraction(fraction) if fraction.is_integer() => fraction.numerator().to_string(),
            Value::fraction(fraction) => render_decimal(fraction.to_f64(), places),
            Value::decimal(decimal) => render_decimal(*decimal, places),
            Value::undefined => "undefined".into(),
        }
    }
}

fn render_decimal(decimal: f64, places: usize) -> String {
    let mut text = format!("{decimal:.places$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

impl From<i64> for Value {
    fn from(integer: i64) -> Self {
        Value::from_fraction(integer, 1)
    }
}

impl From<f64> for Value {
    fn from(decimal: f64) -> Self {
        if decimal.is_finite() {
            Value::decimal(decimal)
        } else {
            Value::undefined
        }
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, other: Value) -> Value {
        self.combine(other, Fraction::checked_add, |left, right| left + right)
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, other: Value) -> Value {
        self.combine(other, Fraction::checked_sub, |left, right| left - right)
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, other: Value) -> Value {
        self.combine(other, Fraction::checked_mul, |left, right| left * right)
    }
}

impl Div for Value {
    type Output = Value;

    fn div(self, other: Value) -> Value {
        if other.is_zero() {
            return Value::undefined;
        }
        self.combine(other, Fraction::checked_div, |left, right| left / right)
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Value::fraction(fraction) => match fraction.checked_neg() {
                Some(negated) => Value::fraction(negated),
                None => Value::from(-fraction.to_f64()),
            },
            Value::decimal(decimal) => Value::decimal(-decimal),
            Value::undefined => Value::undefined,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_PLACES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fractions_are_reduced_with_positive_denominator() {
        let fraction = Fraction::new(6, -8).unwrap();
        assert_eq!((fraction.numerator(), fraction.denominator()), (-3, 4));
        assert_eq!(Fraction::new(1, 0), None);
    }

    #[test]
    fn literals() {
        assert_eq!(Value::from_literal("42"), Value::from(42));
        assert_eq!(Value::from_literal("2.25"), Value::from_fraction(9, 4));
        assert_eq!(Value::from_literal(".5"), Value::from_fraction(1, 2));
        assert_eq!(Value::from_literal("3."), Value::from(3));
        assert_eq!(Value::from_literal("1.2.3"), Value::undefined);
        assert_eq!(Value::from_literal("."), Value::undefined);
        assert_eq!(Value::from_literal("1a"), Value::undefined);
        assert_eq!(Value::from_literal(""), Value::undefined);
    }

    #[test]
    fn oversized_literal_becomes_decimal() {
        let value = Value::from_literal("123456789012345678901234567890");
        assert!(!value.is_exact());
        assert!(value.is_calculable());
    }

    #[test]
    fn exact_arithmetic() {
        let third = Value::from_fraction(1, 3);
        let sixth = Value::from_fraction(1, 6);
        assert_eq!(third + sixth, Value::from_fraction(1, 2));
        assert_eq!(third - sixth, Value::from_fraction(1, 6));
        assert_eq!(third * sixth, Value::from_fraction(1, 18));
        assert_eq!(third / sixth, Value::from(2));
        assert_eq!(Value::from(2).pow(Value::from(10)), Value::from(1024));
        assert_eq!(Value::from_fraction(2, 3).pow(Value::from(2)), Value::from_fraction(4, 9));
        assert_eq!(-third, Value::from_fraction(-1, 3));
    }

    #[test]
    fn decimal_fallback() {
        let root = Value::from(4).pow(Value::from_fraction(1, 2));
        assert_eq!(root, Value::decimal(2.0));
        assert_eq!(Value::from(2).pow(Value::from(-1)), Value::decimal(0.5));
        assert_eq!(Value::from(1) + Value::decimal(0.5), Value::decimal(1.5));
        assert!(!(Value::from(i64::MAX) + Value::from(1)).is_exact());
    }

    #[test]
    fn undefined_results() {
        assert_eq!(Value::from(1) / Value::from(0), Value::undefined);
        assert_eq!(Value::from(1) / Value::decimal(0.0), Value::undefined);
        assert_eq!(Value::from(0).pow(Value::from(-1)), Value::undefined);
        assert_eq!(Value::from(-8).pow(Value::from_fraction(1, 3)), Value::undefined);
        assert_eq!(Value::undefined + Value::from(1), Value::undefined);
        assert_eq!(Value::from(f64::NAN), Value::undefined);
    }

    #[test]
    fn rendering() {
        assert_eq!(Value::from(-7).to_string(), "-7");
        assert_eq!(Value::from_fraction(1, 2).to_string(), "0.5");
        assert_eq!(Value::from_fraction(1, 3).to_string(), "0.3333333333");
        assert_eq!(Value::from_fraction(1, 3).render(3), "0.333");
        assert_eq!(Value::decimal(3.0).to_string(), "3");
        assert_eq!(Value::decimal(-1e-12).to_string(), "0");
        assert_eq!(Value::undefined.to_string(), "undefined");
    }
}

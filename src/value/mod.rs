pub mod error;
pub mod formatter;

use compact_str::{format_compact, CompactString, CompactStringExt, ToCompactString};
use error::{Signature, TypeErrorKind};

/// Strings produced by repetition may not grow past this many bytes.
pub const MAX_STRING_LENGTH: usize = u32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Number,
    String,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(CompactString),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{}", format_number(*v)),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<CompactString> for Value {
    fn from(value: CompactString) -> Self {
        Self::String(value)
    }
}

/// Canonical text of a number: integral values without a fraction, exponent
/// notation outside `[1e-6, 1e21)`, and `Infinity`/`NaN` spelled out.
pub fn format_number(value: f64) -> CompactString {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format_compact!("{value}");
    }
    let formatted = format_compact!("{value:e}");
    if let Some((mantissa, exponent)) = formatted.split_once('e') {
        if !exponent.starts_with('-') {
            return format_compact!("{mantissa}e+{exponent}");
        }
    }
    formatted
}

impl Value {
    pub fn get_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
        }
    }

    /// The value with its type, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::String(v) => format!("string {v:?}"),
            v => format!("{} {v}", v.get_type()),
        }
    }
}

// Unary operators
impl Value {
    pub fn numeric_negate(&self) -> Result<Value, TypeErrorKind> {
        match self {
            Value::Number(v) => Ok(Value::Number(-v)),
            v => Err(TypeErrorKind::UnaryOperand {
                operation: "negation",
                expected: &[ValueType::Number],
                actual: v.clone(),
            }),
        }
    }

    pub fn logical_not(&self) -> Result<Value, TypeErrorKind> {
        match self {
            Value::Bool(v) => Ok(Value::Bool(!v)),
            v => Err(TypeErrorKind::UnaryOperand {
                operation: "logical not",
                expected: &[ValueType::Bool],
                actual: v.clone(),
            }),
        }
    }

    /// Absolute value of a number or length of a string.
    pub fn magnitude(&self) -> Result<Value, TypeErrorKind> {
        match self {
            Value::Number(v) => Ok(Value::Number(v.abs())),
            Value::String(v) => Ok(Value::Number(v.chars().count() as f64)),
            v => Err(TypeErrorKind::UnaryOperand {
                operation: "magnitude",
                expected: &[ValueType::Number, ValueType::String],
                actual: v.clone(),
            }),
        }
    }

    pub fn quote(&self) -> Value {
        match self {
            Value::String(_) => self.clone(),
            v => Value::String(v.to_compact_string()),
        }
    }
}

const ADDITION: &[Signature] = &[Signature {
    operation: "addition",
    lhs: ValueType::Number,
    rhs: ValueType::Number,
}];
const SUBTRACTION: &[Signature] = &[Signature {
    operation: "subtraction",
    lhs: ValueType::Number,
    rhs: ValueType::Number,
}];
const MULTIPLICATION: &[Signature] = &[
    Signature {
        operation: "multiplication",
        lhs: ValueType::Number,
        rhs: ValueType::Number,
    },
    Signature {
        operation: "concatenation",
        lhs: ValueType::String,
        rhs: ValueType::String,
    },
];
const DIVISION: &[Signature] = &[Signature {
    operation: "division",
    lhs: ValueType::Number,
    rhs: ValueType::Number,
}];
const EXPONENTIATION: &[Signature] = &[
    Signature {
        operation: "exponentiation",
        lhs: ValueType::Number,
        rhs: ValueType::Number,
    },
    Signature {
        operation: "repetition",
        lhs: ValueType::String,
        rhs: ValueType::Number,
    },
];
const LESS_THAN: &[Signature] = &[Signature {
    operation: "comparison (less than)",
    lhs: ValueType::Number,
    rhs: ValueType::Number,
}];
const LESS_THAN_OR_EQUAL: &[Signature] = &[Signature {
    operation: "comparison (less or equal)",
    lhs: ValueType::Number,
    rhs: ValueType::Number,
}];
const GREATER_THAN: &[Signature] = &[Signature {
    operation: "comparison (greater than)",
    lhs: ValueType::Number,
    rhs: ValueType::Number,
}];
const GREATER_THAN_OR_EQUAL: &[Signature] = &[Signature {
    operation: "comparison (greater or equal)",
    lhs: ValueType::Number,
    rhs: ValueType::Number,
}];

fn mismatch(expected: &'static [Signature], lhs: &Value, rhs: &Value) -> TypeErrorKind {
    TypeErrorKind::BinaryOperands {
        expected,
        lhs: lhs.clone(),
        rhs: rhs.clone(),
    }
}

// Binary operators
impl Value {
    pub fn add(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs + rhs)),
            (lhs, rhs) => Err(mismatch(ADDITION, lhs, rhs)),
        }
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs - rhs)),
            (lhs, rhs) => Err(mismatch(SUBTRACTION, lhs, rhs)),
        }
    }

    // Arithmetic + string concatenation
    pub fn multiply(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs * rhs)),
            (Value::String(lhs), Value::String(rhs)) => {
                Ok(Value::String([lhs, rhs].concat_compact()))
            }
            (lhs, rhs) => Err(mismatch(MULTIPLICATION, lhs, rhs)),
        }
    }

    pub fn divide(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs / rhs)),
            (lhs, rhs) => Err(mismatch(DIVISION, lhs, rhs)),
        }
    }

    // Exponentiation + string repetition
    pub fn power(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs.powf(*rhs))),
            (Value::String(lhs), Value::Number(rhs)) => repeat(lhs, *rhs),
            (lhs, rhs) => Err(mismatch(EXPONENTIATION, lhs, rhs)),
        }
    }

    // Comparison
    pub fn less_than(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Bool(lhs < rhs)),
            (lhs, rhs) => Err(mismatch(LESS_THAN, lhs, rhs)),
        }
    }

    pub fn less_than_or_equal(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Bool(lhs <= rhs)),
            (lhs, rhs) => Err(mismatch(LESS_THAN_OR_EQUAL, lhs, rhs)),
        }
    }

    pub fn greater_than(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Bool(lhs > rhs)),
            (lhs, rhs) => Err(mismatch(GREATER_THAN, lhs, rhs)),
        }
    }

    pub fn greater_than_or_equal(&self, other: &Value) -> Result<Value, TypeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Bool(lhs >= rhs)),
            (lhs, rhs) => Err(mismatch(GREATER_THAN_OR_EQUAL, lhs, rhs)),
        }
    }

    // Equality
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => lhs == rhs,
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            _ => false,
        }
    }

    pub fn is_not_equal(&self, other: &Value) -> bool {
        !self.is_equal(other)
    }
}

/// Repeats `text` `round(max(0, count))` times.
fn repeat(text: &CompactString, count: f64) -> Result<Value, TypeErrorKind> {
    let rounded = count.max(0.0).round();
    if !rounded.is_finite() {
        return Err(TypeErrorKind::RepetitionOutOfRange(count));
    }
    let times = rounded as usize;
    match text.len().checked_mul(times) {
        Some(length) if length <= MAX_STRING_LENGTH => Ok(Value::String(text.repeat(times).into())),
        _ => Err(TypeErrorKind::RepetitionOutOfRange(count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_text_matches_canonical_form() {
        assert_eq!(format_number(123.0), "123");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(2f64.powi(81)), "2.4178516392292583e+24");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn repetition_rounds_half_up() {
        let text: CompactString = "ab".into();
        assert_eq!(repeat(&text, 2.5), Ok(Value::from("ababab")));
        assert_eq!(repeat(&text, 2.4), Ok(Value::from("abab")));
        assert_eq!(repeat(&text, 0.49999999999999994), Ok(Value::from("")));
        assert_eq!(repeat(&text, 0.5), Ok(Value::from("ab")));
        assert_eq!(repeat(&text, -3.0), Ok(Value::from("")));
        assert_eq!(repeat(&text, f64::NAN), Ok(Value::from("")));
    }

    #[test]
    fn repetition_rejects_unbounded_counts() {
        let text: CompactString = "ab".into();
        assert!(matches!(
            repeat(&text, f64::INFINITY),
            Err(TypeErrorKind::RepetitionOutOfRange(_))
        ));
        assert!(matches!(
            repeat(&text, 1e12),
            Err(TypeErrorKind::RepetitionOutOfRange(_))
        ));
    }

    #[test]
    fn equality_is_strict() {
        assert!(!Value::from(1.0).is_equal(&Value::from("1")));
        assert!(!Value::from(f64::NAN).is_equal(&Value::from(f64::NAN)));
        assert!(Value::from("a").is_equal(&Value::from("a")));
        assert!(Value::from(true).is_not_equal(&Value::from(false)));
    }

    #[test]
    fn mismatch_message_names_signatures() {
        let error = Value::from("foo")
            .add(&Value::from("bar"))
            .expect_err("Strings cannot be added.");
        assert_eq!(
            error.to_string(),
            "Wrong operands (expected addition (number/number), got string \"foo\" and string \"bar\")"
        );
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(Value::from("∞∞").magnitude(), Ok(Value::Number(2.0)));
        assert_eq!(Value::from(-2.5).magnitude(), Ok(Value::Number(2.5)));
        assert!(Value::from(true).magnitude().is_err());
    }
}

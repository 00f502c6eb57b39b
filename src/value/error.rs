use super::{Value, ValueType};
use crate::lexer::Span;
use thiserror::Error;

/// An accepted operand combination of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signature {
    pub operation: &'static str,
    pub lhs: ValueType,
    pub rhs: ValueType,
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.operation, self.lhs, self.rhs)
    }
}

fn describe_types(types: &[ValueType]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn describe_signatures(signatures: &[Signature]) -> String {
    signatures
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeErrorKind {
    #[error("Wrong operand for {operation} (expected {}, got {})", describe_types(.expected), .actual.describe())]
    UnaryOperand {
        operation: &'static str,
        expected: &'static [ValueType],
        actual: Value,
    },
    #[error("Wrong operands (expected {}, got {} and {})", describe_signatures(.expected), .lhs.describe(), .rhs.describe())]
    BinaryOperands {
        expected: &'static [Signature],
        lhs: Value,
        rhs: Value,
    },
    #[error("String repetition count {0} is out of range")]
    RepetitionOutOfRange(f64),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct TypeError {
    #[source]
    pub kind: TypeErrorKind,
    pub span: Span,
}

impl TypeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            TypeErrorKind::UnaryOperand { .. } => "TY001",
            TypeErrorKind::BinaryOperands { .. } => "TY002",
            TypeErrorKind::RepetitionOutOfRange(_) => "TY003",
        }
    }
}

use crate::lexer::{Token, TokenKind};
use crate::value::{error::TypeErrorKind, Value};

/// Binding power of the outermost expression.
pub const BASE_BINDING_POWER: u8 = 0;
/// Binding power of an expression embedded with `${ ... }`.
pub const INTERPOLATION_BINDING_POWER: u8 = 1;
/// Binding power of the operand of `!` and `'`.
pub const UNARY_BINDING_POWER: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOperator {
    /// The operator a token stands for in infix position. Tokens inserted by
    /// interpolation never act as operators here.
    pub fn from_token(token: &Token) -> Option<Self> {
        if token.synthetic {
            return None;
        }
        match token.kind {
            TokenKind::Equal => Some(Self::Equal),
            TokenKind::BangEqual => Some(Self::NotEqual),
            TokenKind::LessThan => Some(Self::LessThan),
            TokenKind::LessThanEqual => Some(Self::LessThanEqual),
            TokenKind::GreaterThan => Some(Self::GreaterThan),
            TokenKind::GreaterThanEqual => Some(Self::GreaterThanEqual),
            TokenKind::Plus => Some(Self::Add),
            TokenKind::Minus => Some(Self::Subtract),
            TokenKind::Star => Some(Self::Multiply),
            TokenKind::Slash => Some(Self::Divide),
            TokenKind::StarStar => Some(Self::Power),
            _ => None,
        }
    }

    pub fn get_binding_power(&self) -> u8 {
        match self {
            // 1. Exponentiation
            Self::Power => 6,
            // 2. Multiplicative operators
            Self::Multiply | Self::Divide => 5,
            // 3. Additive operators
            Self::Add | Self::Subtract => 4,
            // 4. Comparison operators
            Self::LessThan | Self::LessThanEqual | Self::GreaterThan | Self::GreaterThanEqual => 3,
            // 5. Equality operators
            Self::Equal | Self::NotEqual => 2,
        }
    }

    /// Binding power used to parse the right operand. Exponentiation drops one
    /// level so that `a ** b ** c` groups as `a ** (b ** c)`.
    pub fn get_right_binding_power(&self) -> u8 {
        match self {
            Self::Power => self.get_binding_power() - 1,
            _ => self.get_binding_power(),
        }
    }

    pub fn apply(&self, lhs: &Value, rhs: &Value) -> Result<Value, TypeErrorKind> {
        match self {
            Self::Add => lhs.add(rhs),
            Self::Subtract => lhs.subtract(rhs),
            Self::Multiply => lhs.multiply(rhs),
            Self::Divide => lhs.divide(rhs),
            Self::Power => lhs.power(rhs),
            Self::LessThan => lhs.less_than(rhs),
            Self::LessThanEqual => lhs.less_than_or_equal(rhs),
            Self::GreaterThan => lhs.greater_than(rhs),
            Self::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            Self::Equal => Ok(Value::Bool(lhs.is_equal(rhs))),
            Self::NotEqual => Ok(Value::Bool(lhs.is_not_equal(rhs))),
        }
    }
}

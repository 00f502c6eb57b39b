use crate::lexer::{Span, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    #[error("Expected {expected} but got token {actual}.")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("Expected an expression but got token {0}.")]
    NoPrefixHandler(TokenKind),
    #[error("Expected an operator but got token {0}.")]
    NoInfixHandler(TokenKind),
    #[error("Expected the end of an interpolated expression but got token {0}.")]
    UnterminatedInterpolation(TokenKind),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct SyntaxError {
    #[source]
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl SyntaxError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            SyntaxErrorKind::UnexpectedToken { .. } => "SY001",
            SyntaxErrorKind::NoPrefixHandler(_) => "SY002",
            SyntaxErrorKind::NoInfixHandler(_) => "SY003",
            SyntaxErrorKind::UnterminatedInterpolation(_) => "SY004",
        }
    }
}

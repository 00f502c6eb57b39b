use crate::{
    lexer::{LexicalError, Span},
    parser::error::SyntaxError,
    value::error::TypeError,
};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Undefined name `{name}`")]
pub struct NameError {
    pub name: CompactString,
    pub span: Span,
}

/// Every way a single evaluation can fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Name(#[from] NameError),
}

impl EvaluationError {
    pub fn span(&self) -> Span {
        match self {
            Self::Lexical(e) => e.span,
            Self::Syntax(e) => e.span,
            Self::Type(e) => e.span,
            Self::Name(e) => e.span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Lexical(e) => e.code(),
            Self::Syntax(e) => e.code(),
            Self::Type(e) => e.code(),
            Self::Name(_) => "NM001",
        }
    }
}

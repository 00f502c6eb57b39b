use super::token::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string literal")]
    UnterminatedString,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub span: Span,
}

impl LexicalError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            LexicalErrorKind::UnexpectedCharacter(_) => "LX001",
            LexicalErrorKind::UnterminatedString => "LX002",
        }
    }
}

use super::{
    token::{Payload, Token, TokenKind},
    LineBreaks,
};
use crate::lexer::{Lexer, LexicalError, LexicalErrorKind};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub trait ToFormatter<F>
where
    F: TokenFormatter,
{
    fn create_formatter(&self) -> F;
}

/// One token per line as `KIND lexeme value`, with a trailing marker for
/// tokens inserted by interpolation.
pub struct BasicFormatter<'src> {
    text: &'src str,
    line_breaks: LineBreaks,
}

impl<'src> ToFormatter<BasicFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> BasicFormatter<'src> {
        BasicFormatter {
            text: self.get_source(),
            line_breaks: self.get_line_breaks(),
        }
    }
}

impl BasicFormatter<'_> {
    fn format_payload(payload: &Payload) -> String {
        match payload {
            Payload::None => "null".into(),
            Payload::Bool(v) => format!("{v}"),
            Payload::Number(v) => format!("{v:?}"),
            Payload::Text(v) => format!("{v}"),
        }
    }
}

impl TokenFormatter for BasicFormatter<'_> {
    fn format(&self, token: &Token) -> String {
        let value = Self::format_payload(&token.payload);
        match (token.kind, token.synthetic) {
            (TokenKind::Eof, _) => "EOF  null".into(),
            (kind, true) => format!("{kind}  {value} synthetic"),
            (kind, false) => {
                let lexeme = &self.text[token.span.range()];
                format!("{kind} {lexeme} {value}")
            }
        }
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        match error.kind {
            LexicalErrorKind::UnexpectedCharacter(c) => {
                format!("[line {line}] Error: Unexpected character: {c}")
            }
            LexicalErrorKind::UnterminatedString => {
                format!("[line {line}] Error: Unterminated string.")
            }
        }
    }
}

pub struct DebugFormatter;

impl<'src> ToFormatter<DebugFormatter> for Lexer<'src> {
    fn create_formatter(&self) -> DebugFormatter {
        DebugFormatter {}
    }
}

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

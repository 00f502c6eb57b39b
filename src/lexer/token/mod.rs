mod span;

use compact_str::CompactString;
pub use span::{Span, SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::LazyLock;

/// The hashmap for keywords, including the two boolean literals.
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, (TokenKind, Payload)>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();
        map.insert("true", (TokenKind::BooleanLiteral, Payload::Bool(true)));
        map.insert("false", (TokenKind::BooleanLiteral, Payload::Bool(false)));
        map.insert("let", (TokenKind::KeywordLet, Payload::None));
        map.insert("in", (TokenKind::KeywordIn, Payload::None));
        map
    });

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Braces
    LeftBrace,
    RightBrace,
    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Equal,
    BangEqual,
    Bang,
    Bar,
    Quote,

    // Literals
    BooleanLiteral,
    NumericLiteral,
    /// A string segment closed by a quote.
    StringLiteral,
    /// A string segment closed by the start of an interpolation.
    StringPrefix,
    Ident,

    // Keywords
    KeywordLet,
    KeywordIn,

    // End of file.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LEFT_PAREN"),
            TokenKind::RightParenthesis => write!(f, "RIGHT_PAREN"),
            TokenKind::LeftBrace => write!(f, "LEFT_BRACE"),
            TokenKind::RightBrace => write!(f, "RIGHT_BRACE"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Star => write!(f, "STAR"),
            TokenKind::StarStar => write!(f, "STAR_STAR"),
            TokenKind::Slash => write!(f, "SLASH"),
            TokenKind::LessThan => write!(f, "LESS"),
            TokenKind::LessThanEqual => write!(f, "LESS_EQUAL"),
            TokenKind::GreaterThan => write!(f, "GREATER"),
            TokenKind::GreaterThanEqual => write!(f, "GREATER_EQUAL"),
            TokenKind::Equal => write!(f, "EQUAL"),
            TokenKind::BangEqual => write!(f, "BANG_EQUAL"),
            TokenKind::Bang => write!(f, "BANG"),
            TokenKind::Bar => write!(f, "BAR"),
            TokenKind::Quote => write!(f, "QUOTE"),
            TokenKind::BooleanLiteral => write!(f, "BOOLEAN"),
            TokenKind::NumericLiteral => write!(f, "NUMBER"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::StringPrefix => write!(f, "STRING_PREFIX"),
            TokenKind::Ident => write!(f, "IDENTIFIER"),
            TokenKind::KeywordLet => write!(f, "LET"),
            TokenKind::KeywordIn => write!(f, "IN"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// The value a literal or identifier token carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Bool(bool),
    Number(f64),
    Text(CompactString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub payload: Payload,
    /// Set for the `*` and `'` tokens inserted around interpolated expressions.
    pub synthetic: bool,
}

impl Token {
    pub fn symbol(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            payload: Payload::None,
            synthetic: false,
        }
    }

    pub fn literal(kind: TokenKind, payload: Payload, span: Span) -> Self {
        Self {
            kind,
            span,
            payload,
            synthetic: false,
        }
    }

    pub fn synthetic(kind: TokenKind, at: SpanIndex) -> Self {
        Self {
            kind,
            span: Span::point(at),
            payload: Payload::None,
            synthetic: true,
        }
    }

    pub fn text(&self) -> Option<&CompactString> {
        match self.payload {
            Payload::Text(ref text) => Some(text),
            _ => None,
        }
    }
}

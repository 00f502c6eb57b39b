use super::token::SpanIndex;
use std::str::Chars;

#[derive(Debug, Clone, Copy)]
pub struct SourceChar {
    pub value: char,
    pub offset: SpanIndex,
}

impl SourceChar {
    pub fn next_offset(&self) -> SpanIndex {
        self.offset + self.value.len_utf8()
    }
}

/// Character cursor over the source with two characters of lookahead.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    chars: Chars<'src>,
    offset: SpanIndex,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars(),
            offset: 0.into(),
        }
    }

    pub fn offset(&self) -> SpanIndex {
        self.offset
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    pub fn next_char(&mut self) -> Option<SourceChar> {
        let value = self.chars.next()?;
        let offset = self.offset;
        self.offset = self.offset + value.len_utf8();
        Some(SourceChar { value, offset })
    }

    /// Consumes the next character if it is `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            let _ = self.next_char();
            true
        } else {
            false
        }
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            let _ = self.next_char();
        }
    }
}

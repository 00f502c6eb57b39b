mod cursor;
mod error;
pub mod formatter;
mod token;

use compact_str::CompactString;
use cursor::Cursor;
pub use error::{LexicalError, LexicalErrorKind};
use std::{collections::VecDeque, ops::Range, rc::Rc};
pub use token::{Payload, Span, SpanIndex, SpanLength, Token, TokenKind, KEYWORD_HASHMAP};

/// How bare words that are not keywords are lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierMode {
    /// Words are identifiers resolved through the environment.
    #[default]
    Variables,
    /// Words quote themselves: `foo` lexes as `'"foo"`.
    Words,
}

#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_breaks: Rc<[Range<SpanIndex>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let line_breaks = if !text.is_empty() {
            let mut line_breaks = Vec::new();
            let mut cursor: SpanIndex = 0.into();
            for (offset, byte) in text.bytes().enumerate() {
                let offset = (offset + 1).into();
                if byte == b'\n' {
                    line_breaks.push(cursor..offset);
                    cursor = offset;
                }
            }
            if !text.ends_with('\n') {
                line_breaks.push(cursor..(text.len() + 1).into());
            }
            line_breaks
        } else {
            vec![0.into()..1.into()]
        };
        Self {
            line_breaks: line_breaks.into(),
        }
    }

    pub fn get_max_line(&self) -> u32 {
        self.line_breaks.len() as u32
    }

    pub fn get_line(&self, offset: SpanIndex) -> u32 {
        self.line_breaks
            .binary_search_by(|r| {
                if offset < r.start {
                    std::cmp::Ordering::Greater
                } else if offset >= r.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|v| (v + 1) as u32)
            .unwrap_or(self.get_max_line())
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    /// The segment right after an opening quote.
    Opening,
    /// The segment after a `}` that closed an interpolated expression.
    Continuing,
}

/// Pull-based lexer. Interpolated strings are desugared on the fly: the
/// string `"a${x}b"` produces the tokens of `"a" * 'x * "b"`, with the
/// inserted `*` and `'` marked as synthetic.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    mode: IdentifierMode,
    pending: VecDeque<Token>,
    nesting: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_mode(source, IdentifierMode::default())
    }

    pub fn with_mode(source: &'src str, mode: IdentifierMode) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            mode,
            pending: VecDeque::new(),
            nesting: 0,
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    pub fn get_line_breaks(&self) -> LineBreaks {
        LineBreaks::new(self.source)
    }

    /// Number of interpolated expressions currently open.
    pub fn nesting(&self) -> u32 {
        self.nesting
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        let token = loop {
            if let Some(token) = self.pending.pop_front() {
                break token;
            }
            // A failed scan discards whatever it had queued.
            if let Err(error) = self.scan_token() {
                self.pending.clear();
                return Err(error);
            }
        };
        log::trace!(
            "token {} at {:?}{}",
            token.kind,
            token.span.range(),
            if token.synthetic { " (synthetic)" } else { "" }
        );
        Ok(token)
    }
}

impl<'src> Lexer<'src> {
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_whitespace());
            if self.cursor.peek() == Some('/') && self.cursor.peek_second() == Some('/') {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    fn push_symbol(&mut self, kind: TokenKind, start: SpanIndex) {
        let span = Span::new(start, self.cursor.offset());
        self.pending.push_back(Token::symbol(kind, span));
    }

    fn push_synthetic(&mut self, kind: TokenKind) {
        let at = self.cursor.offset();
        self.pending.push_back(Token::synthetic(kind, at));
    }

    fn scan_token(&mut self) -> Result<(), LexicalError> {
        self.skip_trivia();

        let Some(next_char) = self.cursor.next_char() else {
            self.push_symbol(TokenKind::Eof, self.cursor.offset());
            return Ok(());
        };
        let start = next_char.offset;

        let kind = match next_char.value {
            '(' => TokenKind::LeftParenthesis,
            ')' => TokenKind::RightParenthesis,
            '{' => TokenKind::LeftBrace,
            '}' if self.nesting > 0 => {
                self.push_synthetic(TokenKind::Star);
                return self.scan_string_segment(start, Segment::Continuing);
            }
            '}' => TokenKind::RightBrace,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' if self.cursor.eat('*') => TokenKind::StarStar,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '<' if self.cursor.eat('=') => TokenKind::LessThanEqual,
            '<' => TokenKind::LessThan,
            '>' if self.cursor.eat('=') => TokenKind::GreaterThanEqual,
            '>' => TokenKind::GreaterThan,
            '=' => TokenKind::Equal,
            '!' if self.cursor.eat('=') => TokenKind::BangEqual,
            '!' => TokenKind::Bang,
            '|' => TokenKind::Bar,
            '\'' => TokenKind::Quote,
            '∞' => {
                let span = Span::new(start, self.cursor.offset());
                self.pending.push_back(Token::literal(
                    TokenKind::NumericLiteral,
                    Payload::Number(f64::INFINITY),
                    span,
                ));
                return Ok(());
            }
            '"' => return self.scan_string_segment(start, Segment::Opening),
            c if c.is_ascii_digit() => {
                self.scan_number(start);
                return Ok(());
            }
            c if is_word_char(c) => {
                self.scan_word(start);
                return Ok(());
            }
            c => {
                return Err(LexicalError {
                    kind: LexicalErrorKind::UnexpectedCharacter(c),
                    span: Span::new(start, next_char.next_offset()),
                })
            }
        };
        self.push_symbol(kind, start);
        Ok(())
    }

    /// Scans string text up to an unescaped `"` or `${`.
    fn scan_string_segment(&mut self, start: SpanIndex, segment: Segment) -> Result<(), LexicalError> {
        let mut text = CompactString::default();
        loop {
            let Some(next_char) = self.cursor.next_char() else {
                return Err(self.unterminated_string(start));
            };
            match next_char.value {
                '\\' => match self.cursor.next_char() {
                    Some(escaped) => text.push(escaped.value),
                    None => return Err(self.unterminated_string(start)),
                },
                '"' => {
                    let span = Span::new(start, self.cursor.offset());
                    self.pending.push_back(Token::literal(
                        TokenKind::StringLiteral,
                        Payload::Text(text),
                        span,
                    ));
                    if let Segment::Continuing = segment {
                        self.nesting -= 1;
                    }
                    return Ok(());
                }
                '$' if self.cursor.peek() == Some('{') => {
                    let _ = self.cursor.next_char();
                    let span = Span::new(start, self.cursor.offset());
                    self.pending.push_back(Token::literal(
                        TokenKind::StringPrefix,
                        Payload::Text(text),
                        span,
                    ));
                    self.push_synthetic(TokenKind::Star);
                    self.push_synthetic(TokenKind::Quote);
                    if let Segment::Opening = segment {
                        self.nesting += 1;
                    }
                    return Ok(());
                }
                c => text.push(c),
            }
        }
    }

    fn unterminated_string(&self, start: SpanIndex) -> LexicalError {
        LexicalError {
            kind: LexicalErrorKind::UnterminatedString,
            span: Span::new(start, self.cursor.offset()),
        }
    }

    fn scan_number(&mut self, start: SpanIndex) {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_second().is_some_and(|c| c.is_ascii_digit())
        {
            let _ = self.cursor.next_char();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        let span = Span::new(start, self.cursor.offset());
        let value = self.source[span.range()]
            .parse()
            .expect("Digits with an optional fraction are a valid `f64`.");
        self.pending.push_back(Token::literal(
            TokenKind::NumericLiteral,
            Payload::Number(value),
            span,
        ));
    }

    fn scan_word(&mut self, start: SpanIndex) {
        self.cursor.eat_while(is_word_char);
        let span = Span::new(start, self.cursor.offset());
        let lexeme = &self.source[span.range()];

        if let Some((kind, payload)) = KEYWORD_HASHMAP.get(lexeme) {
            self.pending
                .push_back(Token::literal(*kind, payload.clone(), span));
            return;
        }

        match self.mode {
            IdentifierMode::Variables => {
                self.pending.push_back(Token::literal(
                    TokenKind::Ident,
                    Payload::Text(lexeme.into()),
                    span,
                ));
            }
            IdentifierMode::Words => {
                self.pending
                    .push_back(Token::synthetic(TokenKind::Quote, start));
                self.pending.push_back(Token::literal(
                    TokenKind::StringLiteral,
                    Payload::Text(lexeme.into()),
                    span,
                ));
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, bool)> {
        let mut lexer = Lexer::new(source);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token().expect("Source lexes cleanly.");
            kinds.push((token.kind, token.synthetic));
            if token.kind == TokenKind::Eof {
                return kinds;
            }
        }
    }

    #[test]
    fn interpolation_inserts_synthetic_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#""a${x}b""#),
            vec![
                (StringPrefix, false),
                (Star, true),
                (Quote, true),
                (Ident, false),
                (Star, true),
                (StringLiteral, false),
                (Eof, false),
            ]
        );
    }

    #[test]
    fn nesting_returns_to_zero() {
        let mut lexer = Lexer::new(r#""a${"b${1}c"}d""#);
        let mut deepest = 0;
        loop {
            let token = lexer.next_token().expect("Source lexes cleanly.");
            deepest = deepest.max(lexer.nesting());
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        assert_eq!(deepest, 2);
        assert_eq!(lexer.nesting(), 0);
    }

    #[test]
    fn close_brace_outside_interpolation() {
        assert_eq!(
            kinds("{ }"),
            vec![
                (TokenKind::LeftBrace, false),
                (TokenKind::RightBrace, false),
                (TokenKind::Eof, false)
            ]
        );
    }

    #[test]
    fn comment_at_end_of_input() {
        assert_eq!(
            kinds("1 // trailing"),
            vec![(TokenKind::NumericLiteral, false), (TokenKind::Eof, false)]
        );
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new("");
        for _ in 0..3 {
            assert_eq!(
                lexer.next_token().map(|t| t.kind),
                Ok(TokenKind::Eof)
            );
        }
    }

    #[test]
    fn line_numbers() {
        let breaks = LineBreaks::new("a\nbc\n\nd");
        assert_eq!(breaks.get_line(0.into()), 1);
        assert_eq!(breaks.get_line(2.into()), 2);
        assert_eq!(breaks.get_line(5.into()), 3);
        assert_eq!(breaks.get_line(6.into()), 4);
    }
}

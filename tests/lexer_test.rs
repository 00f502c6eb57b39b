use proptest::prelude::*;

use exprel::lexer::{
    formatter::{BasicFormatter, ToFormatter, TokenFormatter},
    IdentifierMode, Lexer, LexicalErrorKind, Token, TokenKind,
};

fn render(scanner: &mut Lexer<'_>) -> String {
    let formatter: BasicFormatter = scanner.create_formatter();
    let mut lines = Vec::new();
    loop {
        match scanner.next_token() {
            Ok(token) => {
                lines.push(formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => {
                lines.push(formatter.format_lexical_error(&error));
            }
        }
    }
    lines.join("\n")
}

fn check(input: &str, expected: &str) {
    let mut scanner = Lexer::new(input);
    assert_eq!(render(&mut scanner), expected, "Failed to lex {input:?}");
}

#[test]
fn smoke_test() {
    check("", "EOF  null");
}

#[test]
fn punctuation() {
    check(
        "( ) { + - * ** / < <= > >= = != ! | '",
        "LEFT_PAREN ( null
RIGHT_PAREN ) null
LEFT_BRACE { null
PLUS + null
MINUS - null
STAR * null
STAR_STAR ** null
SLASH / null
LESS < null
LESS_EQUAL <= null
GREATER > null
GREATER_EQUAL >= null
EQUAL = null
BANG_EQUAL != null
BANG ! null
BAR | null
QUOTE ' null
EOF  null",
    );
}

#[test]
fn literals_and_keywords() {
    check(
        "12 3.25 ∞ true false let in pi",
        "NUMBER 12 12.0
NUMBER 3.25 3.25
NUMBER ∞ inf
BOOLEAN true true
BOOLEAN false false
LET let null
IN in null
IDENTIFIER pi pi
EOF  null",
    );
}

#[test]
fn number_without_fraction_digits() {
    check(
        "1.",
        "NUMBER 1 1.0
[line 1] Error: Unexpected character: .
EOF  null",
    );
}

#[test]
fn comments_and_whitespace() {
    check(
        "// leading comment\n  1 // one\n// two\n+ 2",
        "NUMBER 1 1.0
PLUS + null
NUMBER 2 2.0
EOF  null",
    );
}

#[test]
fn escapes_keep_the_escaped_character() {
    check(
        r#""\"foo\" \n \${x}""#,
        r#"STRING "\"foo\" \n \${x}" "foo" n ${x}
EOF  null"#,
    );
}

#[test]
fn interpolation() {
    check(
        r#""a${1}b${"c"}d""#,
        r#"STRING_PREFIX "a${ a
STAR  null synthetic
QUOTE  null synthetic
NUMBER 1 1.0
STAR  null synthetic
STRING_PREFIX }b${ b
STAR  null synthetic
QUOTE  null synthetic
STRING "c" c
STAR  null synthetic
STRING }d" d
EOF  null"#,
    );
}

#[test]
fn unterminated_string() {
    check(
        "\"foo",
        "[line 1] Error: Unterminated string.
EOF  null",
    );
    check(
        "\"a${1}b",
        "STRING_PREFIX \"a${ a
STAR  null synthetic
QUOTE  null synthetic
NUMBER 1 1.0
[line 1] Error: Unterminated string.
EOF  null",
    );
}

#[test]
fn unexpected_character() {
    let mut scanner = Lexer::new("1 # 2");
    let kinds: Vec<_> = std::iter::from_fn(|| Some(scanner.next_token()))
        .take(4)
        .map(|result| result.map(|token| token.kind).map_err(|error| error.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            Ok(TokenKind::NumericLiteral),
            Err(LexicalErrorKind::UnexpectedCharacter('#')),
            Ok(TokenKind::NumericLiteral),
            Ok(TokenKind::Eof),
        ]
    );
}

#[test]
fn words_quote_themselves() {
    let mut scanner = Lexer::with_mode("hello let", IdentifierMode::Words);
    assert_eq!(
        render(&mut scanner),
        "QUOTE  null synthetic
STRING hello hello
LET let null
EOF  null"
    );
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("**".to_string()),
        Just("/".to_string()),
        Just("<".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just(">=".to_string()),
        Just("=".to_string()),
        Just("!".to_string()),
        Just("!=".to_string()),
        Just("|".to_string()),
        Just("'".to_string()),
        Just("∞".to_string()),
    ]
}

fn numeric_literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]+".prop_map(|s| s),          // Integer literals
        "[0-9]+\\.[0-9]+".prop_map(|s| s)  // Decimal literals
    ]
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[^\"\\\\$]*".prop_map(|s: String| format!("\"{}\"", s))
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]*".prop_map(|s: String| s)
}

fn comment_strategy() -> impl Strategy<Value = String> {
    "[^\n]*".prop_map(|s: String| format!("//{}\n", s))
}

fn token_sequence_without_comments_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

fn token_sequence_with_comments_strategy() -> impl Strategy<Value = String> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            comment_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
    .prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens_without_comments(input in token_sequence_without_comments_strategy()) {
        // Add 1 to include EOF token
        let expected_num_tokens = input.len() + 1;
        let input = input.join(" ");
        let mut scanner = Lexer::new(&input);
        let mut num_tokens = 0;
        loop {
            num_tokens += 1;
            match scanner.next_token() {
                Ok(Token { kind: TokenKind::Eof, .. }) => {
                    break;
                },
                token => {
                    prop_assert!(token.is_ok());
                }
            }
        }
        prop_assert_eq!(num_tokens, expected_num_tokens);
    }

    #[test]
    fn lexer_handles_valid_tokens_with_comments(input in token_sequence_with_comments_strategy()) {
        let mut scanner = Lexer::new(&input);
        loop {
            match scanner.next_token() {
                Ok(Token { kind: TokenKind::Eof, .. }) => break,
                token => prop_assert!(token.is_ok()),
            }
        }
    }

    #[test]
    fn lexer_always_reaches_eof(input in "\\PC{0,64}") {
        let mut scanner = Lexer::new(&input);
        let mut reached_eof = false;
        // At most four tokens per three bytes (`}${`), plus the end of file.
        for _ in 0..2 * input.len() + 2 {
            if let Ok(Token { kind: TokenKind::Eof, .. }) = scanner.next_token() {
                reached_eof = true;
                break;
            }
        }
        prop_assert!(reached_eof);
    }
}

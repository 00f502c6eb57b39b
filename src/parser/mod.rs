pub mod error;
pub mod operator;

use crate::{
    environment::Environment,
    error::{EvaluationError, NameError},
    lexer::{IdentifierMode, Lexer, Payload, Span, Token, TokenKind},
    value::{error::TypeError, error::TypeErrorKind, Value},
};
use error::{SyntaxError, SyntaxErrorKind};
use operator::{
    BinaryOperator, BASE_BINDING_POWER, INTERPOLATION_BINDING_POWER, UNARY_BINDING_POWER,
};

type NullDenotation<'src> =
    fn(&mut Parser<'src>, Token, &Environment) -> Result<Value, EvaluationError>;
type LeftDenotation<'src> =
    fn(&mut Parser<'src>, Value, Token, &Environment) -> Result<Value, EvaluationError>;

/// Pratt parser that evaluates as it parses: every denotation returns the
/// value of the sub-expression it consumed instead of a syntax tree.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    previous: Token,
    current: Token,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_mode(source, IdentifierMode::default())
    }

    pub fn with_mode(source: &'src str, mode: IdentifierMode) -> Self {
        let start = Token::symbol(TokenKind::Eof, Span::point(0.into()));
        Self {
            lexer: Lexer::with_mode(source, mode),
            previous: start.clone(),
            current: start,
        }
    }

    /// Parses and evaluates the whole source as one expression.
    pub fn evaluate(&mut self, environment: &Environment) -> Result<Value, EvaluationError> {
        self.advance(None)?;
        let value = self.expression(BASE_BINDING_POWER, environment)?;
        self.advance(Some(TokenKind::Eof))?;
        Ok(value)
    }

    /// Moves to the next token. When `expected` is given, the token being
    /// consumed must be of that kind.
    fn advance(&mut self, expected: Option<TokenKind>) -> Result<(), EvaluationError> {
        if let Some(expected) = expected {
            if self.current.kind != expected {
                return Err(SyntaxError {
                    kind: SyntaxErrorKind::UnexpectedToken {
                        expected,
                        actual: self.current.kind,
                    },
                    span: self.current.span,
                }
                .into());
            }
        }
        let next = self.lexer.next_token()?;
        self.previous = std::mem::replace(&mut self.current, next);
        Ok(())
    }

    /// Consumes one of the tokens inserted around an interpolated expression.
    fn advance_synthetic(&mut self, expected: TokenKind) -> Result<(), EvaluationError> {
        if self.current.kind != expected || !self.current.synthetic {
            return Err(SyntaxError {
                kind: SyntaxErrorKind::UnterminatedInterpolation(self.current.kind),
                span: self.current.span,
            }
            .into());
        }
        self.advance(None)
    }

    fn type_error(&self, operator: &Token, kind: TypeErrorKind) -> EvaluationError {
        TypeError {
            kind,
            span: operator.span.merge(&self.previous.span),
        }
        .into()
    }
}

// Pratt core
impl<'src> Parser<'src> {
    fn expression(
        &mut self,
        min_bp: u8,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        let Some(nud) = Self::null_denotation(self.current.kind) else {
            return Err(SyntaxError {
                kind: SyntaxErrorKind::NoPrefixHandler(self.current.kind),
                span: self.current.span,
            }
            .into());
        };
        self.advance(None)?;
        let token = self.previous.clone();
        let mut lhs = nud(self, token, environment)?;

        while self.peek_binding_power().is_some_and(|bp| bp > min_bp) {
            self.advance(None)?;
            let operator = self.previous.clone();
            let Some(led) = Self::left_denotation(&operator) else {
                return Err(SyntaxError {
                    kind: SyntaxErrorKind::NoInfixHandler(operator.kind),
                    span: operator.span,
                }
                .into());
            };
            lhs = led(self, lhs, operator, environment)?;
        }
        Ok(lhs)
    }

    fn peek_binding_power(&self) -> Option<u8> {
        BinaryOperator::from_token(&self.current).map(|operator| operator.get_binding_power())
    }

    fn null_denotation(kind: TokenKind) -> Option<NullDenotation<'src>> {
        match kind {
            TokenKind::BooleanLiteral | TokenKind::NumericLiteral | TokenKind::StringLiteral => {
                Some(Self::literal)
            }
            TokenKind::StringPrefix => Some(Self::interpolation),
            TokenKind::Ident => Some(Self::identifier),
            TokenKind::Minus => Some(Self::negation),
            TokenKind::Bang => Some(Self::logical_not),
            TokenKind::Bar => Some(Self::magnitude),
            TokenKind::Quote => Some(Self::quote),
            TokenKind::LeftParenthesis => Some(Self::group),
            TokenKind::KeywordLet => Some(Self::let_binding),
            _ => None,
        }
    }

    fn left_denotation(operator: &Token) -> Option<LeftDenotation<'src>> {
        BinaryOperator::from_token(operator).map(|_| Self::binary as LeftDenotation<'src>)
    }
}

// Null denotations
impl<'src> Parser<'src> {
    fn literal(&mut self, token: Token, _: &Environment) -> Result<Value, EvaluationError> {
        let value = match token.payload {
            Payload::Bool(v) => Value::Bool(v),
            Payload::Number(v) => Value::Number(v),
            Payload::Text(v) => Value::String(v),
            Payload::None => unreachable!("Literal tokens always carry a payload."),
        };
        Ok(value)
    }

    /// A string with embedded expressions: the head segment is followed by
    /// `* '<expression> * <segment>` until a segment closes the string.
    fn interpolation(
        &mut self,
        head: Token,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        let mut text = self.literal(head, environment)?;
        loop {
            let operator = self.current.clone();
            self.advance_synthetic(TokenKind::Star)?;
            self.advance_synthetic(TokenKind::Quote)?;
            let embedded = self
                .expression(INTERPOLATION_BINDING_POWER, environment)?
                .quote();
            text = text
                .multiply(&embedded)
                .map_err(|kind| self.type_error(&operator, kind))?;

            let operator = self.current.clone();
            self.advance_synthetic(TokenKind::Star)?;
            let segment = self.current.clone();
            if !matches!(segment.kind, TokenKind::StringLiteral | TokenKind::StringPrefix) {
                return Err(SyntaxError {
                    kind: SyntaxErrorKind::UnterminatedInterpolation(segment.kind),
                    span: segment.span,
                }
                .into());
            }
            self.advance(None)?;
            let closes = segment.kind == TokenKind::StringLiteral;
            let segment = self.literal(segment, environment)?;
            text = text
                .multiply(&segment)
                .map_err(|kind| self.type_error(&operator, kind))?;
            if closes {
                return Ok(text);
            }
        }
    }

    fn identifier(
        &mut self,
        token: Token,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        let Payload::Text(name) = token.payload else {
            unreachable!("Identifier tokens always carry their name.");
        };
        match environment.lookup(&name) {
            Some(value) => Ok(value.clone()),
            None => Err(NameError {
                name,
                span: token.span,
            }
            .into()),
        }
    }

    fn negation(
        &mut self,
        operator: Token,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        // Exponentiation stays inside the operand: `-2 ** 2` is `-(2 ** 2)`.
        let operand = self.expression(
            BinaryOperator::Power.get_right_binding_power(),
            environment,
        )?;
        operand
            .numeric_negate()
            .map_err(|kind| self.type_error(&operator, kind))
    }

    fn logical_not(
        &mut self,
        operator: Token,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        let operand = self.expression(UNARY_BINDING_POWER, environment)?;
        operand
            .logical_not()
            .map_err(|kind| self.type_error(&operator, kind))
    }

    fn magnitude(
        &mut self,
        operator: Token,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        let operand = self.expression(BASE_BINDING_POWER, environment)?;
        self.advance(Some(TokenKind::Bar))?;
        operand
            .magnitude()
            .map_err(|kind| self.type_error(&operator, kind))
    }

    fn quote(&mut self, _: Token, environment: &Environment) -> Result<Value, EvaluationError> {
        let operand = self.expression(UNARY_BINDING_POWER, environment)?;
        Ok(operand.quote())
    }

    fn group(&mut self, _: Token, environment: &Environment) -> Result<Value, EvaluationError> {
        let inner = self.expression(BASE_BINDING_POWER, environment)?;
        self.advance(Some(TokenKind::RightParenthesis))?;
        Ok(inner)
    }

    /// `let name = value in body`: the name is visible in the body only.
    fn let_binding(
        &mut self,
        _: Token,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        self.advance(Some(TokenKind::Ident))?;
        let name = self
            .previous
            .text()
            .cloned()
            .expect("Identifier tokens always carry their name.");
        self.advance(Some(TokenKind::Equal))?;
        let value = self.expression(BASE_BINDING_POWER, environment)?;
        self.advance(Some(TokenKind::KeywordIn))?;

        log::trace!("binding `{name}` to {value}");
        let scope = environment.bind(name, value);
        self.expression(BASE_BINDING_POWER, &scope)
    }
}

// Left denotations
impl<'src> Parser<'src> {
    fn binary(
        &mut self,
        lhs: Value,
        operator: Token,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        let binary = BinaryOperator::from_token(&operator)
            .expect("Only binary operator tokens have a left denotation.");
        let rhs = self.expression(binary.get_right_binding_power(), environment)?;
        binary
            .apply(&lhs, &rhs)
            .map_err(|kind| self.type_error(&operator, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Result<Value, EvaluationError> {
        Parser::new(source).evaluate(&Environment::new())
    }

    #[test]
    fn right_operand_binding_power() {
        assert_eq!(run("2 - 3 - 4"), Ok(Value::Number(-5.0)));
        assert_eq!(run("2 ** 3 ** 2"), Ok(Value::Number(512.0)));
    }

    #[test]
    fn negation_binds_below_exponentiation() {
        assert_eq!(run("-2 ** 2"), Ok(Value::Number(-4.0)));
        assert_eq!(run("2 ** -1 ** 2"), Ok(Value::Number(0.5)));
        assert_eq!(run("-2 * 3 ** 2"), Ok(Value::Number(-18.0)));
        assert_eq!(run("-1 + 2 * 3 - 4"), Ok(Value::Number(1.0)));
        assert_eq!(run("(1 + 2) * -3 - 4"), Ok(Value::Number(-13.0)));
    }

    #[test]
    fn interpolated_string_is_one_primary() {
        assert_eq!(run(r#"2 < 3 = "a${1}b" = "a1b""#), Ok(Value::Bool(false)));
        assert_eq!(run(r#""a${1 + 1}b" = "a2b""#), Ok(Value::Bool(true)));
        assert_eq!(run(r#""x" * "a${1}b""#), Ok(Value::from("xa1b")));
    }

    #[test]
    fn let_inside_interpolation_stops_at_segment() {
        assert_eq!(
            run(r#""<${let x = 2 in x * x}>""#),
            Ok(Value::from("<4>"))
        );
    }

    #[test]
    fn type_error_span_covers_operator_and_operand() {
        let error = run("1 + \"two\"").expect_err("Mixed addition fails.");
        assert_eq!(error.span().range(), 2..9);
    }

    #[test]
    fn missing_close_of_interpolation() {
        let error = run(r#""${1 )}""#).expect_err("Stray parenthesis.");
        assert!(matches!(
            error,
            EvaluationError::Syntax(SyntaxError {
                kind: SyntaxErrorKind::UnterminatedInterpolation(TokenKind::RightParenthesis),
                ..
            })
        ));
    }
}

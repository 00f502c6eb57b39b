pub mod environment;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod value;

pub use environment::Environment;
pub use error::EvaluationError;
pub use lexer::IdentifierMode;
pub use value::Value;

use parser::Parser;

/// Evaluates `source` with no bound names.
pub fn evaluate(source: &str) -> Result<Value, EvaluationError> {
    Evaluator::new().evaluate(source)
}

/// Evaluates `source` with the names bound in `environment` in scope.
pub fn evaluate_with(source: &str, environment: &Environment) -> Result<Value, EvaluationError> {
    Evaluator::new()
        .with_environment(environment.clone())
        .evaluate(source)
}

/// Evaluation settings reused across calls.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    environment: Environment,
    identifier_mode: IdentifierMode,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_identifier_mode(mut self, identifier_mode: IdentifierMode) -> Self {
        self.identifier_mode = identifier_mode;
        self
    }

    pub fn evaluate(&self, source: &str) -> Result<Value, EvaluationError> {
        log::debug!(
            "evaluating {} bytes ({:?} identifiers, {} scopes)",
            source.len(),
            self.identifier_mode,
            self.environment.depth()
        );
        let mut parser = Parser::with_mode(source, self.identifier_mode);
        let result = parser.evaluate(&self.environment);
        match result {
            Ok(ref value) => log::debug!("evaluated to {}", value.describe()),
            Err(ref error) => log::debug!("evaluation failed with {}: {error}", error.code()),
        }
        result
    }
}

//! Evaluator contract
//!
//! The harness treats the evaluator as a black box: it compiles expression
//! text, accepts variables, and evaluates against an optional input. Failures
//! are reported as [`EvaluatorError`]s; only parse and evaluate failures count
//! as classified.

use jsonata_suite_diagnostics::EvaluatorError;
use serde_json::Value;

/// Prefix JSONata uses for variable references
pub const VARIABLE_SIGIL: char = '$';

/// An expression evaluator under test
pub trait Evaluator {
    type Expression: Expression;

    /// Compile expression text
    fn parse(&self, text: &str) -> Result<Self::Expression, EvaluatorError>;
}

/// A compiled expression with its own variable environment
pub trait Expression {
    /// Assign a variable before evaluation; `name` includes the `$` sigil
    fn set_variable(&mut self, name: &str, value: Value);

    /// Evaluate against `input` (`None` is undefined input).
    ///
    /// Returns `Ok(None)` when the result is undefined.
    fn evaluate(&self, input: Option<&Value>) -> Result<Option<Value>, EvaluatorError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    type Expression = E::Expression;

    fn parse(&self, text: &str) -> Result<Self::Expression, EvaluatorError> {
        (**self).parse(text)
    }
}

/// Environment name of a fixture binding
pub fn variable_name(binding: &str) -> String {
    format!("{}{}", VARIABLE_SIGIL, binding)
}

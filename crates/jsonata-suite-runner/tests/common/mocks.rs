//! Mock evaluator for testing
//!
//! Understands just enough of the language to exercise the runner:
//! - `$` evaluates to the input
//! - `$name` evaluates to a bound variable, or undefined when unbound
//! - any JSON literal evaluates to itself
//!
//! Everything else is a parse error unless configured with [`MockEvaluator::on`].

use jsonata_suite_diagnostics::EvaluatorError;
use jsonata_suite_runner::{Evaluator, Expression};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Configured behavior for one expression text
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Return(Value),
    Undefined,
    ParseError(&'static str),
    EvaluateError(&'static str),
    Unclassified,
    Panic,
}

#[derive(Default)]
pub struct MockEvaluator {
    behaviors: HashMap<String, MockBehavior>,
    parsed: RefCell<Vec<String>>,
}

impl MockEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the behavior of an expression text
    pub fn on(mut self, expr: &str, behavior: MockBehavior) -> Self {
        self.behaviors.insert(expr.to_string(), behavior);
        self
    }

    /// Expression texts parsed so far, in order
    pub fn parsed(&self) -> Vec<String> {
        self.parsed.borrow().clone()
    }
}

pub struct MockExpression {
    text: String,
    behavior: Option<MockBehavior>,
    variables: HashMap<String, Value>,
}

impl Evaluator for MockEvaluator {
    type Expression = MockExpression;

    fn parse(&self, text: &str) -> Result<MockExpression, EvaluatorError> {
        self.parsed.borrow_mut().push(text.to_string());

        let behavior = self.behaviors.get(text).cloned();
        match &behavior {
            Some(MockBehavior::ParseError(code)) => {
                return Err(EvaluatorError::parse(format!("cannot parse {}", text))
                    .with_code(code.parse().unwrap()));
            }
            Some(_) => {}
            None => {
                let understood =
                    text.starts_with('$') || serde_json::from_str::<Value>(text).is_ok();
                if !understood {
                    return Err(EvaluatorError::parse(format!("Syntax error: {}", text))
                        .with_code("S0201".parse().unwrap()));
                }
            }
        }

        Ok(MockExpression {
            text: text.to_string(),
            behavior,
            variables: HashMap::new(),
        })
    }
}

impl Expression for MockExpression {
    fn set_variable(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    fn evaluate(&self, input: Option<&Value>) -> Result<Option<Value>, EvaluatorError> {
        match &self.behavior {
            Some(MockBehavior::Return(value)) => return Ok(Some(value.clone())),
            Some(MockBehavior::Undefined) => return Ok(None),
            Some(MockBehavior::EvaluateError(code)) => {
                return Err(EvaluatorError::evaluate(format!("cannot evaluate {}", self.text))
                    .with_code(code.parse().unwrap()));
            }
            Some(MockBehavior::Unclassified) => {
                return Err(EvaluatorError::other("internal evaluator error"));
            }
            Some(MockBehavior::Panic) => panic!("evaluator crashed on {}", self.text),
            Some(MockBehavior::ParseError(_)) | None => {}
        }

        if self.text == "$" {
            return Ok(input.cloned());
        }
        if self.text.starts_with('$') {
            return Ok(self.variables.get(&self.text).cloned());
        }
        serde_json::from_str(&self.text)
            .map(Some)
            .map_err(|e| EvaluatorError::evaluate(e.to_string()))
    }
}

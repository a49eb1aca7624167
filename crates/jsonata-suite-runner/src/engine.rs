//! Execution engine
//!
//! Each case runs through a small state machine with terminal states
//! ignored, passed and failed:
//!
//! 1. a skip-registered group or case is ignored;
//! 2. the expression is parsed;
//! 3. bindings are injected as `$name` variables;
//! 4. the expression is evaluated against the resolved input;
//! 5. the result is compared, unless the case declares an undefined result.
//!
//! A classified evaluator failure passes when the case expects one; every
//! other failure, and a success where a failure was expected, fails the case.

use crate::compare::{canonical_text, Comparator, Comparison};
use crate::evaluator::{variable_name, Evaluator, Expression};
use crate::report::{Reporter, RunSummary, TestId};
use jsonata_suite_diagnostics::{EvaluatorError, Failure, FailureKind};
use jsonata_suite_fixture::{Case, Group, SkipRegistry, SuiteTree};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};

/// Terminal state of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ignored { reason: Option<String> },
    Passed { via: PassKind },
    Failed { failure: Failure },
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored { .. })
    }

    fn failed(failure: Failure) -> Self {
        Outcome::Failed { failure }
    }
}

/// How a case passed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// A comparison strategy agreed
    Compared { strategy: &'static str },
    /// The evaluator raised the classified failure the case expected
    ExpectedFailure { kind: FailureKind },
    /// The case declares an undefined result; nothing was compared
    UndefinedResult,
}

/// Runs suite trees against one evaluator
pub struct SuiteRunner<E> {
    evaluator: E,
    skip: SkipRegistry,
    comparator: Comparator,
}

impl<E: Evaluator> SuiteRunner<E> {
    pub fn new(evaluator: E, skip: SkipRegistry) -> Self {
        Self {
            evaluator,
            skip,
            comparator: Comparator::default(),
        }
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Run every group in order, emitting events to `reporter`
    pub fn run(&self, tree: &SuiteTree, reporter: &mut dyn Reporter) -> RunSummary {
        let mut summary = RunSummary::default();
        for group in &tree.groups {
            self.run_group(group, reporter, &mut summary);
        }

        log::info!(
            "Ran {} cases: {} passed, {} failed, {} ignored",
            summary.total,
            summary.passed,
            summary.failed,
            summary.ignored
        );
        summary
    }

    /// Run one group.
    ///
    /// A skipped group reports itself and each of its cases as ignored; any
    /// other group brackets its cases with started/finished.
    pub fn run_group(&self, group: &Group, reporter: &mut dyn Reporter, summary: &mut RunSummary) {
        let group_id = TestId::group(&group.name);
        let group_skipped = self.skip.is_group_skipped(&group.name);

        if group_skipped {
            log::debug!("Skipping group {}", group.name);
            reporter.ignored(&group_id);
        } else {
            reporter.started(&group_id);
        }

        for case in &group.cases {
            let id = TestId::case(&group.name, &case.name);
            let outcome = if group_skipped || self.skip.is_case_skipped(&group.name, &case.name) {
                reporter.ignored(&id);
                Outcome::Ignored {
                    reason: self.skip.reason(&group.name, Some(&case.name)).map(str::to_string),
                }
            } else {
                reporter.started(&id);
                let outcome = self.execute(case);
                match &outcome {
                    Outcome::Failed { failure } => reporter.failed(&id, failure),
                    _ => reporter.finished(&id),
                }
                outcome
            };

            log::debug!("{}: {:?}", id, outcome);
            summary.record(&group.name, &case.name, outcome);
        }

        if !group_skipped {
            reporter.finished(&group_id);
        }
    }

    /// Run the skip check and then the case
    pub fn run_case(&self, group: &str, case: &Case) -> Outcome {
        if self.skip.is_group_skipped(group) || self.skip.is_case_skipped(group, &case.name) {
            return Outcome::Ignored {
                reason: self.skip.reason(group, Some(&case.name)).map(str::to_string),
            };
        }
        self.execute(case)
    }

    /// Parse, bind, evaluate and verify a case, turning evaluator panics into failures
    pub fn execute(&self, case: &Case) -> Outcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.execute_unguarded(case))).unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Outcome::failed(Failure::Panicked { message })
        })
    }

    fn execute_unguarded(&self, case: &Case) -> Outcome {
        let mut expression = match self.evaluator.parse(&case.expr) {
            Ok(expression) => expression,
            Err(err) => return classify_error(case, err),
        };

        for (name, value) in &case.bindings {
            expression.set_variable(&variable_name(name), value.clone());
        }

        let actual = match expression.evaluate(case.input.value()) {
            Ok(actual) => actual,
            Err(err) => return classify_error(case, err),
        };

        if case.expectation.expects_failure() {
            return Outcome::failed(Failure::MissingExpectedFailure {
                code: case.expectation.code().map(str::to_string),
                actual: canonical_text(actual.as_ref()),
            });
        }

        if case.undefined_result {
            return Outcome::Passed {
                via: PassKind::UndefinedResult,
            };
        }

        match self.comparator.compare(case.expected.as_ref(), actual.as_ref()) {
            Comparison::Agreed { strategy } => Outcome::Passed {
                via: PassKind::Compared { strategy },
            },
            Comparison::Mismatch { expected, actual } => {
                Outcome::failed(Failure::Mismatch { expected, actual })
            }
        }
    }
}

fn classify_error(case: &Case, err: EvaluatorError) -> Outcome {
    if case.expectation.expects_failure() && err.is_classified() {
        Outcome::Passed {
            via: PassKind::ExpectedFailure { kind: err.kind },
        }
    } else {
        Outcome::failed(Failure::unexpected(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonata_suite_fixture::{CaseInput, Expectation};
    use serde_json::{json, Value};

    /// Evaluates every expression to its input
    struct Identity;

    struct IdentityExpression;

    impl Evaluator for Identity {
        type Expression = IdentityExpression;

        fn parse(&self, text: &str) -> Result<IdentityExpression, EvaluatorError> {
            match text {
                "(" => Err(EvaluatorError::parse("unbalanced")),
                "!" => panic!("lexer bug"),
                _ => Ok(IdentityExpression),
            }
        }
    }

    impl Expression for IdentityExpression {
        fn set_variable(&mut self, _name: &str, _value: Value) {}

        fn evaluate(&self, input: Option<&Value>) -> Result<Option<Value>, EvaluatorError> {
            Ok(input.cloned())
        }
    }

    fn case(expr: &str, input: CaseInput, expected: Option<Value>) -> Case {
        Case {
            name: "case000".into(),
            expr: expr.into(),
            input,
            expected,
            undefined_result: false,
            expectation: Expectation::None,
            bindings: Default::default(),
            timelimit: None,
            depth: None,
        }
    }

    fn runner() -> SuiteRunner<Identity> {
        SuiteRunner::new(Identity, SkipRegistry::new())
    }

    #[test]
    fn test_compared_pass() {
        let outcome = runner().execute(&case("$", CaseInput::Inline(json!(6)), Some(json!(6))));
        assert_eq!(
            outcome,
            Outcome::Passed {
                via: PassKind::Compared { strategy: "canonical-text" }
            }
        );
    }

    #[test]
    fn test_undefined_input_against_null_expectation_fails() {
        let outcome = runner().execute(&case("$", CaseInput::Undefined, Some(Value::Null)));
        assert!(outcome.is_failed());
    }

    #[test]
    fn test_parse_failure_is_unexpected() {
        let outcome = runner().execute(&case("(", CaseInput::Undefined, None));
        assert_eq!(
            outcome,
            Outcome::Failed {
                failure: Failure::unexpected(EvaluatorError::parse("unbalanced"))
            }
        );
    }

    #[test]
    fn test_panic_becomes_failure() {
        let outcome = runner().execute(&case("!", CaseInput::Undefined, None));
        assert_eq!(
            outcome,
            Outcome::Failed {
                failure: Failure::Panicked {
                    message: "lexer bug".into()
                }
            }
        );
    }

    #[test]
    fn test_run_case_respects_skips() {
        let mut skip = SkipRegistry::new();
        skip.skip_cases("fields", ["case000"], Some("issue #1"));
        let runner = SuiteRunner::new(Identity, skip);

        let outcome = runner.run_case("fields", &case("(", CaseInput::Undefined, None));
        assert_eq!(
            outcome,
            Outcome::Ignored {
                reason: Some("issue #1".into())
            }
        );
    }
}

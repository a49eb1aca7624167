//! Per-case failure diagnostics

use crate::EvaluatorError;
use serde::Serialize;
use thiserror::Error;

/// Why a case failed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Failure {
    /// No comparison strategy agreed; carries both canonical renderings
    #[error("result mismatch\nexpected:\n{expected}\nactual:\n{actual}")]
    Mismatch { expected: String, actual: String },

    /// The evaluator failed and the case did not expect it, or the failure was unclassified
    #[error("unexpected {error}")]
    UnexpectedError { error: EvaluatorError },

    /// The case declared an error code but evaluation succeeded
    #[error("expected error{} but evaluation returned {actual}", expected_code(.code))]
    MissingExpectedFailure { code: Option<String>, actual: String },

    /// The evaluator panicked
    #[error("evaluator panicked: {message}")]
    Panicked { message: String },
}

fn expected_code(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" {}", c)).unwrap_or_default()
}

impl Failure {
    pub fn unexpected(error: EvaluatorError) -> Self {
        Self::UnexpectedError { error }
    }

    /// First line of the diagnostic, for summaries and tables
    pub fn headline(&self) -> String {
        match self {
            Failure::Mismatch { .. } => "result mismatch".to_string(),
            other => other.to_string().lines().next().unwrap_or_default().to_string(),
        }
    }

    /// Render for the console: a mismatch as a diff with expected lines
    /// prefixed by a red `-` and actual lines by a green `+`
    #[cfg(feature = "colored")]
    pub fn to_colored_string(&self) -> String {
        use colored::Colorize;

        match self {
            Failure::Mismatch { expected, actual } => {
                let mut out = format!(
                    "{} ({} expected, {} actual)\n",
                    self.headline(),
                    "-".red(),
                    "+".green()
                );
                for line in expected.lines() {
                    out.push_str(&format!("{}\n", format!("- {}", line).red()));
                }
                for line in actual.lines() {
                    out.push_str(&format!("{}\n", format!("+ {}", line).green()));
                }
                out
            }
            other => other.to_string().red().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_expected_failure_message() {
        let failure = Failure::MissingExpectedFailure {
            code: Some("T0410".into()),
            actual: "42".into(),
        };
        assert_eq!(
            failure.to_string(),
            "expected error T0410 but evaluation returned 42"
        );
    }

    #[test]
    fn test_headline_of_mismatch() {
        let failure = Failure::Mismatch {
            expected: "1".into(),
            actual: "2".into(),
        };
        assert_eq!(failure.headline(), "result mismatch");
    }

    #[test]
    fn test_headline_of_unexpected() {
        let failure = Failure::unexpected(EvaluatorError::parse("Syntax error: \")\""));
        assert_eq!(failure.headline(), "unexpected parse error: Syntax error: \")\"");
    }

    #[cfg(feature = "colored")]
    #[test]
    fn test_colored_mismatch_marks_expected_with_minus() {
        colored::control::set_override(false);
        let failure = Failure::Mismatch {
            expected: "[\n  1\n]".into(),
            actual: "2".into(),
        };
        assert_eq!(
            failure.to_colored_string(),
            "result mismatch (- expected, + actual)\n- [\n-   1\n- ]\n+ 2\n"
        );
    }
}

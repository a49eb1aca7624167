//! Suite error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Load-time error raised while reading datasets, fixtures or skip configuration.
///
/// Any of these aborts harness construction: no partial suite tree is built.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A file or directory could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file does not hold valid JSON
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Neither `expr` nor `expr-file` is present
    #[error("[{group}.{case}] No JSONata expression specified for test")]
    MissingExpression { group: String, case: String },

    /// The file named by `expr-file` could not be read
    #[error("[{group}.{case}] Unable to read expression file {}: {source}", path.display())]
    ExpressionFile {
        group: String,
        case: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `dataset` names a dataset that was never loaded
    #[error("[{group}.{case}] Dataset with name {dataset} not found")]
    UnknownDataset {
        group: String,
        case: String,
        dataset: String,
    },

    /// The fixture is neither an object nor an array of objects
    #[error("[{group}.{case}] Not a JSON object or array")]
    InvalidShape { group: String, case: String },

    /// A known field holds a value of the wrong type
    #[error("[{group}.{case}] Invalid fixture field: {source}")]
    InvalidField {
        group: String,
        case: String,
        #[source]
        source: serde_json::Error,
    },

    /// The skip configuration file is malformed
    #[error("invalid skip configuration {}: {source}", path.display())]
    SkipConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FixtureError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Classification of an evaluator failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The expression could not be compiled
    Parse,
    /// The expression failed while being evaluated
    Evaluate,
    /// Anything the evaluator did not classify
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Parse => write!(f, "parse error"),
            FailureKind::Evaluate => write!(f, "evaluate error"),
            FailureKind::Other => write!(f, "unclassified error"),
        }
    }
}

/// Failure raised by the evaluator under test
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}{}: {message}", code_suffix(.code))]
pub struct EvaluatorError {
    pub kind: FailureKind,
    pub code: Option<ErrorCode>,
    pub message: String,
}

fn code_suffix(code: &Option<ErrorCode>) -> String {
    code.as_ref().map(|c| format!(" {}", c)).unwrap_or_default()
}

impl EvaluatorError {
    /// Create a classified parse failure
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Parse, message)
    }

    /// Create a classified evaluate failure
    pub fn evaluate(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Evaluate, message)
    }

    /// Create an unclassified failure
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Other, message)
    }

    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Attach the JSONata error code reported by the evaluator
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Parse and evaluate failures are classified; everything else is not
    pub fn is_classified(&self) -> bool {
        matches!(self.kind, FailureKind::Parse | FailureKind::Evaluate)
    }
}

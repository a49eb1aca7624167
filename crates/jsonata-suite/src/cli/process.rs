//! Evaluator backed by an external process
//!
//! The command runs once per case. It receives one JSON request on stdin:
//!
//! ```json
//! {"expr": "$sum(Account.Order.Price)", "input": {...}, "bindings": {"price": 5}}
//! ```
//!
//! `input` is omitted when the input is undefined, and binding names carry no
//! `$` sigil. The command answers with one JSON object on stdout:
//!
//! - `{"result": value}` for a defined result
//! - `{}` for an undefined result
//! - `{"error": {"kind": "parse" | "evaluate", "code": "S0201", "message": "..."}}`
//!
//! When `kind` is absent the code's family decides: static (`S`) codes are parse
//! failures, every other code an evaluate failure. A non-zero exit status or
//! malformed output is an unclassified failure.

use jsonata_suite_diagnostics::{ErrorCode, EvaluatorError};
use jsonata_suite_runner::{Evaluator, Expression, VARIABLE_SIGIL};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Program and arguments of the evaluator command
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProcessCommand {
    program: String,
    args: Vec<String>,
}

/// Evaluator that delegates every case to an external command
#[derive(Debug, Clone)]
pub struct ProcessEvaluator {
    command: Arc<ProcessCommand>,
}

impl ProcessEvaluator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: Arc::new(ProcessCommand {
                program: program.into(),
                args,
            }),
        }
    }

    pub fn program(&self) -> &str {
        &self.command.program
    }
}

impl Evaluator for ProcessEvaluator {
    type Expression = ProcessExpression;

    /// Parsing happens in the child; parse failures surface from `evaluate`
    fn parse(&self, text: &str) -> Result<ProcessExpression, EvaluatorError> {
        Ok(ProcessExpression {
            command: Arc::clone(&self.command),
            expr: text.to_string(),
            bindings: Map::new(),
        })
    }
}

/// Expression text plus its bindings, evaluated by spawning the command
#[derive(Debug, Clone)]
pub struct ProcessExpression {
    command: Arc<ProcessCommand>,
    expr: String,
    bindings: Map<String, Value>,
}

#[derive(Serialize)]
struct Request<'a> {
    expr: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a Value>,
    bindings: &'a Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    error: Option<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    kind: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

/// `"result": null` is a defined null result, not an undefined one
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Expression for ProcessExpression {
    fn set_variable(&mut self, name: &str, value: Value) {
        let name = name.strip_prefix(VARIABLE_SIGIL).unwrap_or(name);
        self.bindings.insert(name.to_string(), value);
    }

    fn evaluate(&self, input: Option<&Value>) -> Result<Option<Value>, EvaluatorError> {
        let request = serde_json::to_vec(&Request {
            expr: &self.expr,
            input,
            bindings: &self.bindings,
        })
        .map_err(|e| EvaluatorError::other(format!("Failed to encode request: {}", e)))?;

        let stdout = self.spawn(&request)?;
        let response: Response = serde_json::from_slice(&stdout).map_err(|e| {
            EvaluatorError::other(format!(
                "Malformed evaluator output ({}): {}",
                e,
                String::from_utf8_lossy(&stdout).trim()
            ))
        })?;

        match response.error {
            Some(error) => Err(classify(error)),
            None => Ok(response.result),
        }
    }
}

impl ProcessExpression {
    fn spawn(&self, request: &[u8]) -> Result<Vec<u8>, EvaluatorError> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EvaluatorError::other(format!("Failed to start {}: {}", self.command.program, e))
            })?;

        // stdin is written while stdout and stderr drain
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(request),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.map_err(|e| {
            EvaluatorError::other(format!("Failed to wait for {}: {}", self.command.program, e))
        })?;

        match written {
            Ok(Ok(())) => {}
            // the child may answer without reading its input
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => {
                return Err(EvaluatorError::other(format!(
                    "Failed to write to {}: {}",
                    self.command.program, e
                )));
            }
            Err(_) => {
                return Err(EvaluatorError::other(format!(
                    "Writer for {} panicked",
                    self.command.program
                )));
            }
        }

        if !output.status.success() {
            return Err(EvaluatorError::other(format!(
                "{} exited with {}: {}",
                self.command.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

fn classify(error: ResponseError) -> EvaluatorError {
    let code = error.code.as_deref().and_then(|code| match code.parse::<ErrorCode>() {
        Ok(code) => Some(code),
        Err(e) => {
            log::debug!("Ignoring evaluator error code: {}", e);
            None
        }
    });
    let message = error.message.unwrap_or_default();

    let classified = match error.kind.as_deref() {
        Some("parse") => EvaluatorError::parse(message),
        Some("evaluate") => EvaluatorError::evaluate(message),
        Some(other) => {
            log::debug!("Unknown evaluator error kind: {}", other);
            EvaluatorError::other(message)
        }
        None => match &code {
            Some(code) if code.is_static() => EvaluatorError::parse(message),
            Some(_) => EvaluatorError::evaluate(message),
            None => EvaluatorError::other(message),
        },
    };

    match code {
        Some(code) => classified.with_code(code),
        None => classified,
    }
}

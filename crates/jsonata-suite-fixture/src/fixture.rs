//! Fixture resolution
//!
//! A fixture file holds either one case object or an array of case objects.
//! Each object is resolved into a [`Case`]:
//!
//! | field | effect |
//! |---|---|
//! | `expr` | inline expression text |
//! | `expr-file` | expression file, relative to the group directory |
//! | `data` | inline input value (JSON null included) |
//! | `dataset` | name of a loaded dataset; null or absent means undefined input |
//! | `undefinedResult` | `true` suppresses result comparison |
//! | `result` | expected output |
//! | `code`, `error.code` | the case expects a parse or evaluate failure |
//! | `bindings` | variables injected before evaluation |
//! | `timelimit`, `depth`, `token` | carried for reporting, not enforced |

use crate::{Datasets, FixtureError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Variables injected into the evaluation environment, in declaration order
pub type Bindings = IndexMap<String, Value>;

/// Evaluation input of a case
#[derive(Debug, Clone, PartialEq)]
pub enum CaseInput {
    /// Value given inline through `data`
    Inline(Value),
    /// Value of a named dataset
    Dataset { name: String, value: Arc<Value> },
    /// No input at all; distinct from JSON null
    Undefined,
}

impl CaseInput {
    /// The input value, `None` for undefined input
    pub fn value(&self) -> Option<&Value> {
        match self {
            CaseInput::Inline(value) => Some(value),
            CaseInput::Dataset { value, .. } => Some(value),
            CaseInput::Undefined => None,
        }
    }
}

/// Whether a case expects the evaluator to fail
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Expectation {
    #[default]
    None,
    /// Any parse or evaluate failure passes; `code` and `token` are informational
    Failure {
        code: Option<String>,
        token: Option<String>,
    },
}

impl Expectation {
    pub fn expects_failure(&self) -> bool {
        matches!(self, Expectation::Failure { .. })
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Expectation::Failure { code, .. } => code.as_deref(),
            Expectation::None => None,
        }
    }
}

/// A resolved test case
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub name: String,
    /// Expression text, with code points above 0xFF escaped
    pub expr: String,
    pub input: CaseInput,
    /// Expected result; always `None` when `undefined_result` is set
    pub expected: Option<Value>,
    pub undefined_result: bool,
    pub expectation: Expectation,
    pub bindings: Bindings,
    /// Declared time limit in milliseconds
    pub timelimit: Option<u64>,
    /// Declared evaluation depth limit
    pub depth: Option<u64>,
}

/// Where a fixture lives and what it may reference
#[derive(Debug, Clone, Copy)]
pub struct FixtureContext<'a> {
    pub group: &'a str,
    pub group_dir: &'a Path,
    pub datasets: &'a Datasets,
}

/// Top-level shape of a fixture file
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureShape {
    Single(Map<String, Value>),
    Batch(Vec<Map<String, Value>>),
}

impl FixtureShape {
    /// Classify a parsed fixture; anything but an object or an array of objects is rejected
    pub fn classify(value: Value, group: &str, case: &str) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(FixtureShape::Single(object)),
            Value::Array(items) if items.is_empty() => {
                log::warn!("[{}.{}] Fixture is an empty array, no cases", group, case);
                Ok(FixtureShape::Batch(Vec::new()))
            }
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(object) => Ok(object),
                    _ => Err(FixtureError::InvalidShape {
                        group: group.to_string(),
                        case: batch_case_name(case, index),
                    }),
                })
                .collect::<Result<Vec<_>>>()
                .map(FixtureShape::Batch),
            _ => Err(FixtureError::InvalidShape {
                group: group.to_string(),
                case: case.to_string(),
            }),
        }
    }

    /// Flatten into (case name, object) pairs; batch entries are named `<base>-<index>`
    pub fn into_named(self, base: &str) -> Vec<(String, Map<String, Value>)> {
        match self {
            FixtureShape::Single(object) => vec![(base.to_string(), object)],
            FixtureShape::Batch(objects) => objects
                .into_iter()
                .enumerate()
                .map(|(index, object)| (batch_case_name(base, index), object))
                .collect(),
        }
    }
}

fn batch_case_name(base: &str, index: usize) -> String {
    format!("{}-{}", base, index)
}

/// Resolve one parsed fixture file into its cases
pub fn resolve_fixture(value: Value, case: &str, ctx: FixtureContext<'_>) -> Result<Vec<Case>> {
    FixtureShape::classify(value, ctx.group, case)?
        .into_named(case)
        .into_iter()
        .map(|(name, object)| resolve_case(name, object, ctx))
        .collect()
}

/// Raw field contract of a single case object
#[derive(Debug, Deserialize)]
struct RawCase {
    expr: Option<String>,
    #[serde(rename = "expr-file")]
    expr_file: Option<String>,
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
    dataset: Option<String>,
    #[serde(rename = "undefinedResult")]
    undefined_result: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    code: Option<Value>,
    token: Option<String>,
    error: Option<RawError>,
    bindings: Option<Map<String, Value>>,
    timelimit: Option<u64>,
    depth: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    #[serde(default, deserialize_with = "present")]
    code: Option<Value>,
    token: Option<String>,
}

/// Keep an explicit JSON null as `Some(Value::Null)`; only a missing field is `None`
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn resolve_case(name: String, object: Map<String, Value>, ctx: FixtureContext<'_>) -> Result<Case> {
    let raw: RawCase =
        serde_json::from_value(Value::Object(object)).map_err(|source| FixtureError::InvalidField {
            group: ctx.group.to_string(),
            case: name.clone(),
            source,
        })?;

    let expr = resolve_expression(&raw, &name, ctx)?;
    let input = resolve_input(&raw, &name, ctx)?;

    let undefined_result = raw.undefined_result.unwrap_or(false);
    let expected = if undefined_result {
        None
    } else {
        raw.result.map(normalize_whole_numbers)
    };

    let expectation = resolve_expectation(raw.code, raw.token, raw.error);

    log::trace!("Resolved {}/{}", ctx.group, name);

    Ok(Case {
        name,
        expr: escape_expression(&expr),
        input,
        expected,
        undefined_result,
        expectation,
        bindings: raw.bindings.map(|b| b.into_iter().collect()).unwrap_or_default(),
        timelimit: raw.timelimit,
        depth: raw.depth,
    })
}

fn resolve_expression(raw: &RawCase, case: &str, ctx: FixtureContext<'_>) -> Result<String> {
    if let Some(expr) = &raw.expr {
        return Ok(expr.clone());
    }

    let Some(file) = &raw.expr_file else {
        return Err(FixtureError::MissingExpression {
            group: ctx.group.to_string(),
            case: case.to_string(),
        });
    };

    let path = ctx.group_dir.join(file);
    fs::read_to_string(&path).map_err(|source| FixtureError::ExpressionFile {
        group: ctx.group.to_string(),
        case: case.to_string(),
        path,
        source,
    })
}

fn resolve_input(raw: &RawCase, case: &str, ctx: FixtureContext<'_>) -> Result<CaseInput> {
    if let Some(data) = &raw.data {
        return Ok(CaseInput::Inline(data.clone()));
    }

    match &raw.dataset {
        Some(name) => {
            let value = ctx
                .datasets
                .get(name)
                .ok_or_else(|| FixtureError::UnknownDataset {
                    group: ctx.group.to_string(),
                    case: case.to_string(),
                    dataset: name.clone(),
                })?;
            Ok(CaseInput::Dataset {
                name: name.clone(),
                value: Arc::clone(value),
            })
        }
        None => Ok(CaseInput::Undefined),
    }
}

fn resolve_expectation(code: Option<Value>, token: Option<String>, error: Option<RawError>) -> Expectation {
    if let Some(code) = code {
        return Expectation::Failure {
            code: code_text(code),
            token,
        };
    }

    match error {
        Some(RawError {
            code: Some(code),
            token: error_token,
        }) => Expectation::Failure {
            code: code_text(code),
            token: error_token.or(token),
        },
        _ => Expectation::None,
    }
}

fn code_text(code: Value) -> Option<String> {
    match code {
        Value::Null => None,
        Value::String(code) => Some(code),
        other => Some(other.to_string()),
    }
}

/// Escape every UTF-16 code unit above 0xFF as `\uXXXX`.
///
/// Characters outside the basic multilingual plane become a surrogate pair
/// of escapes, which the JSONata lexer recombines.
pub fn escape_expression(expr: &str) -> String {
    let mut escaped = String::with_capacity(expr.len());
    for c in expr.chars() {
        if u32::from(c) > 0xFF {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(escaped, "\\u{:04X}", unit);
            }
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Replace floating-point numbers holding a whole value by integers, at any depth.
///
/// Values outside the `i64` range are left untouched.
pub fn normalize_whole_numbers(value: Value) -> Value {
    match value {
        Value::Number(number) if number.is_f64() => number
            .as_f64()
            .and_then(whole_number)
            .map(Value::from)
            .unwrap_or(Value::Number(number)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_whole_numbers).collect()),
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, value)| (key, normalize_whole_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

fn whole_number(n: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    let in_range = n >= i64::MIN as f64 && n < i64::MAX as f64;
    (n.is_finite() && n.fract() == 0.0 && in_range).then_some(n as i64)
}

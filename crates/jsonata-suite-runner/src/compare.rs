//! Result comparison
//!
//! Expected and actual results are checked by an ordered list of strategies.
//! The first strategy that agrees decides; when none agrees the case fails
//! with both canonical renderings as its diagnostic.

use jsonata_suite_diagnostics::Failure;
use serde_json::{Number, Value};

const UNDEFINED: &str = "undefined";

/// One way of deciding that two results are equal
pub trait ComparisonStrategy {
    fn name(&self) -> &'static str;

    /// `None` stands for an undefined result
    fn agrees(&self, expected: Option<&Value>, actual: Option<&Value>) -> bool;
}

/// Pretty-printed JSON with object keys sorted, undefined rendered as `undefined`
pub fn canonical_text(value: Option<&Value>) -> String {
    match value {
        Some(value) => {
            let value = sorted_keys(value);
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
        None => UNDEFINED.to_string(),
    }
}

// Maps keep insertion order, so key order is normalized before rendering
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

/// Equal canonical text
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalText;

impl ComparisonStrategy for CanonicalText {
    fn name(&self) -> &'static str {
        "canonical-text"
    }

    fn agrees(&self, expected: Option<&Value>, actual: Option<&Value>) -> bool {
        canonical_text(expected) == canonical_text(actual)
    }
}

/// Deep equality: objects as key/value sets, arrays elementwise, numbers by value
#[derive(Debug, Clone, Copy, Default)]
pub struct Structural;

impl ComparisonStrategy for Structural {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn agrees(&self, expected: Option<&Value>, actual: Option<&Value>) -> bool {
        match (expected, actual) {
            (Some(expected), Some(actual)) => values_equal(expected, actual),
            (None, None) => true,
            _ => false,
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, a)| y.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    matches!((x.as_f64(), y.as_f64()), (Some(a), Some(b)) if a == b)
}

/// Result of running the comparator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Agreed { strategy: &'static str },
    Mismatch { expected: String, actual: String },
}

impl Comparison {
    pub fn is_agreed(&self) -> bool {
        matches!(self, Comparison::Agreed { .. })
    }

    pub fn into_failure(self) -> Option<Failure> {
        match self {
            Comparison::Agreed { .. } => None,
            Comparison::Mismatch { expected, actual } => Some(Failure::Mismatch { expected, actual }),
        }
    }
}

/// Ordered list of comparison strategies; the first that agrees wins
pub struct Comparator {
    strategies: Vec<Box<dyn ComparisonStrategy>>,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(vec![Box::new(CanonicalText), Box::new(Structural)])
    }
}

impl std::fmt::Debug for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.strategy_names()).finish()
    }
}

impl Comparator {
    pub fn new(strategies: Vec<Box<dyn ComparisonStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a strategy, tried after the existing ones
    pub fn with_strategy(mut self, strategy: impl ComparisonStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn compare(&self, expected: Option<&Value>, actual: Option<&Value>) -> Comparison {
        for strategy in &self.strategies {
            if strategy.agrees(expected, actual) {
                return Comparison::Agreed {
                    strategy: strategy.name(),
                };
            }
            log::trace!("{} comparison disagreed", strategy.name());
        }

        Comparison::Mismatch {
            expected: canonical_text(expected),
            actual: canonical_text(actual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_canonical_text_is_pretty() {
        let text = canonical_text(Some(&json!({"b": 1, "a": [true, null]})));
        assert_eq!(text, "{\n  \"a\": [\n    true,\n    null\n  ],\n  \"b\": 1\n}");
    }

    #[test]
    fn test_canonical_text_ignores_document_key_order() {
        let text = canonical_text(Some(&parse(r#"[{"z": {"y": 1, "x": 2}, "a": 0}]"#)));
        assert_eq!(
            text,
            "[\n  {\n    \"a\": 0,\n    \"z\": {\n      \"x\": 2,\n      \"y\": 1\n    }\n  }\n]"
        );
    }

    #[test]
    fn test_canonical_text_of_undefined() {
        assert_eq!(canonical_text(None), "undefined");
    }

    #[rstest]
    #[case(json!(6), json!(6), true)]
    #[case(json!("6"), json!(6), false)]
    #[case(json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1}), true)]
    fn test_canonical_text_strategy(#[case] expected: Value, #[case] actual: Value, #[case] agrees: bool) {
        assert_eq!(CanonicalText.agrees(Some(&expected), Some(&actual)), agrees);
    }

    #[rstest]
    #[case("2", "2.0", true)]
    #[case("[1, 2.5]", "[1.0, 2.5]", true)]
    #[case("{\"a\": [1, {\"b\": 3}]}", "{\"a\": [1.0, {\"b\": 3.0}]}", true)]
    #[case("-1", "18446744073709551615", false)]
    #[case("[1, 2]", "[2, 1]", false)]
    #[case("{\"a\": 1}", "{\"a\": 1, \"b\": null}", false)]
    #[case("null", "false", false)]
    #[case("\"1\"", "1", false)]
    fn test_structural_strategy(#[case] expected: &str, #[case] actual: &str, #[case] agrees: bool) {
        assert_eq!(Structural.agrees(Some(&parse(expected)), Some(&parse(actual))), agrees);
    }

    #[test]
    fn test_undefined_only_matches_undefined() {
        assert!(Structural.agrees(None, None));
        assert!(!Structural.agrees(None, Some(&Value::Null)));
        assert!(!CanonicalText.agrees(Some(&Value::Null), None));
    }

    #[test]
    fn test_text_tier_wins_first() {
        let comparator = Comparator::default();
        assert_eq!(
            comparator.compare(Some(&json!(6)), Some(&json!(6))),
            Comparison::Agreed { strategy: "canonical-text" }
        );
    }

    #[test]
    fn test_structural_tier_rescues_number_formatting() {
        let comparator = Comparator::default();
        assert_eq!(
            comparator.compare(Some(&json!(2)), Some(&parse("2.0"))),
            Comparison::Agreed { strategy: "structural" }
        );
    }

    #[test]
    fn test_mismatch_carries_canonical_text() {
        let comparison = Comparator::default().compare(Some(&json!([1, 2])), Some(&json!("x")));
        assert!(!comparison.is_agreed());
        assert_eq!(
            comparison.into_failure(),
            Some(Failure::Mismatch {
                expected: "[\n  1,\n  2\n]".into(),
                actual: "\"x\"".into(),
            })
        );
    }

    struct AlwaysAgree;

    impl ComparisonStrategy for AlwaysAgree {
        fn name(&self) -> &'static str {
            "always"
        }

        fn agrees(&self, _: Option<&Value>, _: Option<&Value>) -> bool {
            true
        }
    }

    #[test]
    fn test_custom_strategy_appended() {
        let comparator = Comparator::default().with_strategy(AlwaysAgree);
        assert_eq!(comparator.strategy_names(), vec!["canonical-text", "structural", "always"]);
        assert_eq!(
            comparator.compare(Some(&json!(1)), Some(&json!(2))),
            Comparison::Agreed { strategy: "always" }
        );
    }
}

//! List command implementation

use super::output::{self, OutputFormat};
use super::suite::SuiteOptions;
use anyhow::Result;
use jsonata_suite_fixture::{Case, CaseInput, Expectation, SkipRegistry, SuiteTree};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

const EXPRESSION_WIDTH: usize = 48;

/// Configuration for list command
pub struct ListConfig {
    pub suite: SuiteOptions,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// One listed case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct CaseEntry {
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Case")]
    pub case: String,
    #[tabled(rename = "Expression")]
    pub expr: String,
    #[tabled(rename = "Input")]
    pub input: String,
    #[tabled(rename = "Expects")]
    pub expects: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl CaseEntry {
    fn new(group: &str, case: &Case, skip: &SkipRegistry) -> Self {
        let ignored = skip.is_group_skipped(group) || skip.is_case_skipped(group, &case.name);
        let status = match (ignored, skip.reason(group, Some(&case.name))) {
            (true, Some(reason)) => format!("ignored ({})", reason),
            (true, None) => "ignored".to_string(),
            (false, _) => "active".to_string(),
        };

        Self {
            group: group.to_string(),
            case: case.name.clone(),
            expr: case.expr.clone(),
            input: match &case.input {
                CaseInput::Inline(_) => "inline".to_string(),
                CaseInput::Dataset { name, .. } => name.clone(),
                CaseInput::Undefined => "undefined".to_string(),
            },
            expects: match &case.expectation {
                Expectation::Failure { code: Some(code), .. } => format!("error {}", code),
                Expectation::Failure { code: None, .. } => "error".to_string(),
                Expectation::None if case.undefined_result => "undefined".to_string(),
                Expectation::None => "result".to_string(),
            },
            status,
        }
    }
}

/// Every case of the tree with its skip status, in run order
pub fn entries(tree: &SuiteTree, skip: &SkipRegistry) -> Vec<CaseEntry> {
    tree.groups
        .iter()
        .flat_map(|group| group.cases.iter().map(move |case| CaseEntry::new(&group.name, case, skip)))
        .collect()
}

/// List the cases of a suite
pub fn list(config: ListConfig) -> Result<()> {
    let skip = config.suite.skip_registry()?;
    let tree = config.suite.load_tree()?;
    let entries = entries(&tree, &skip);

    let content = match OutputFormat::parse_or(config.output_format.as_deref(), OutputFormat::Table) {
        OutputFormat::Json => output::format_json(&entries, false)?,
        OutputFormat::JsonPretty => output::format_json(&entries, true)?,
        OutputFormat::Table => format_table(&entries),
    };

    output::write_output(&content, config.output_file.as_deref())
}

fn format_table(entries: &[CaseEntry]) -> String {
    if entries.is_empty() {
        return "(no cases)".to_string();
    }

    let rows = entries.iter().cloned().map(|mut entry| {
        entry.expr = truncate(&entry.expr.replace('\n', " "), EXPRESSION_WIDTH);
        entry
    });
    Table::new(rows).with(Style::modern()).to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonata_suite_fixture::{resolve_fixture, Datasets, FixtureContext, Group};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::Path;

    fn tree() -> SuiteTree {
        let mut datasets = Datasets::new();
        datasets.insert("dataset0", json!({"a": 1}));
        let ctx = FixtureContext {
            group: "fields",
            group_dir: Path::new("."),
            datasets: &datasets,
        };
        let mut cases = resolve_fixture(json!({"expr": "a", "dataset": "dataset0", "result": 1}), "case000", ctx).unwrap();
        cases.extend(resolve_fixture(json!({"expr": "b", "code": "T0410"}), "case001", ctx).unwrap());
        cases.extend(resolve_fixture(json!({"expr": "c", "data": null, "undefinedResult": true}), "case002", ctx).unwrap());

        SuiteTree {
            groups: vec![Group {
                name: "fields".into(),
                dir: Path::new(".").to_path_buf(),
                cases,
            }],
        }
    }

    #[test]
    fn test_entries_describe_cases() {
        let mut skip = SkipRegistry::new();
        skip.skip_cases("fields", ["case001"], Some("issue #9"));

        let entries = entries(&tree(), &skip);
        let described: Vec<_> = entries
            .iter()
            .map(|e| (e.case.as_str(), e.input.as_str(), e.expects.as_str(), e.status.as_str()))
            .collect();
        assert_eq!(
            described,
            vec![
                ("case000", "dataset0", "result", "active"),
                ("case001", "undefined", "error T0410", "ignored (issue #9)"),
                ("case002", "inline", "undefined", "active"),
            ]
        );
    }

    #[test]
    fn test_table_has_headers() {
        let table = format_table(&entries(&tree(), &SkipRegistry::new()));
        assert!(table.contains("Group"));
        assert!(table.contains("Expects"));
        assert!(table.contains("case002"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}

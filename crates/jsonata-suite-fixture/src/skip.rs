//! Skip registry
//!
//! Tracks suite entries known to be broken for the evaluator under test. The
//! registry is a plain value handed to the runner, independent of the corpus:
//! entries are added in code, read from a JSON file, or both.
//!
//! Configuration file format:
//!
//! ```json
//! {
//!   "groups": { "transform": "issue #47" },
//!   "cases": { "joins": { "index-15": "issue #50" } }
//! }
//! ```
//!
//! Either level may also be a plain list of names when no reason is recorded.

use crate::{FixtureError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Excluded groups and excluded (group, case) pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipRegistry {
    groups: HashMap<String, Option<String>>,
    cases: HashMap<String, HashMap<String, Option<String>>>,
}

impl SkipRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a whole group
    pub fn skip_group(&mut self, group: impl Into<String>, reason: Option<&str>) -> &mut Self {
        self.groups.insert(group.into(), reason.map(str::to_string));
        self
    }

    /// Exclude individual cases of a group
    pub fn skip_cases<I, S>(&mut self, group: &str, cases: I, reason: Option<&str>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = self.cases.entry(group.to_string()).or_default();
        for case in cases {
            entries.insert(case.into(), reason.map(str::to_string));
        }
        self
    }

    pub fn is_group_skipped(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// True when the case itself is excluded.
    ///
    /// Always false for cases of an excluded group: the group-level signal
    /// already covers them.
    pub fn is_case_skipped(&self, group: &str, case: &str) -> bool {
        !self.is_group_skipped(group)
            && self
                .cases
                .get(group)
                .is_some_and(|cases| cases.contains_key(case))
    }

    /// Recorded reason for a skipped group, or for a skipped case of it
    pub fn reason(&self, group: &str, case: Option<&str>) -> Option<&str> {
        if let Some(reason) = self.groups.get(group) {
            return reason.as_deref();
        }
        let case = case?;
        self.cases.get(group)?.get(case)?.as_deref()
    }

    /// Add every entry of `other`; entries of `other` win on conflict
    pub fn merge(&mut self, other: SkipRegistry) -> &mut Self {
        self.groups.extend(other.groups);
        for (group, cases) in other.cases {
            self.cases.entry(group).or_default().extend(cases);
        }
        self
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn case_count(&self) -> usize {
        self.cases.values().map(HashMap::len).sum()
    }

    /// Parse a registry from its JSON configuration form
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let config: SkipConfig = serde_json::from_str(json)?;
        Ok(config.into())
    }

    /// Read a registry from a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FixtureError::io(path, e))?;
        let registry = Self::from_json_str(&content).map_err(|source| FixtureError::SkipConfig {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "Read {} skipped groups and {} skipped cases from {}",
            registry.group_count(),
            registry.case_count(),
            path.display()
        );
        Ok(registry)
    }

    /// Known issues of the jsonata4java evaluator against the 1.8.3 suite
    pub fn known_issues() -> Self {
        let mut registry = Self::new();
        for (group, reason) in KNOWN_GROUPS {
            registry.skip_group(*group, Some(*reason));
        }
        for (group, cases, reason) in KNOWN_CASES {
            registry.skip_cases(group, cases.iter().copied(), Some(*reason));
        }
        registry
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SkipConfig {
    #[serde(default)]
    groups: Entries,
    #[serde(default)]
    cases: HashMap<String, Entries>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entries {
    Names(Vec<String>),
    Reasons(HashMap<String, Option<String>>),
}

impl Default for Entries {
    fn default() -> Self {
        Entries::Names(Vec::new())
    }
}

impl Entries {
    fn into_map(self) -> HashMap<String, Option<String>> {
        match self {
            Entries::Names(names) => names.into_iter().map(|name| (name, None)).collect(),
            Entries::Reasons(reasons) => reasons,
        }
    }
}

impl From<SkipConfig> for SkipRegistry {
    fn from(config: SkipConfig) -> Self {
        Self {
            groups: config.groups.into_map(),
            cases: config
                .cases
                .into_iter()
                .map(|(group, cases)| (group, cases.into_map()))
                .collect(),
        }
    }
}

const KNOWN_GROUPS: &[(&str, &str)] = &[
    ("transform", "issue #47"),
    ("transforms", "issue #47"),
    ("function-formatNumber", "issue #49"),
    ("function-tomillis", "issue #52"),
    ("partial-application", "issue #53"),
    ("closures", "issue #56"),
    ("matchers", "issue #57"),
    ("hof-zip-map", "issue #58"),
    ("parent-operator", "issue #60"),
    ("function-distinct", "issue #63"),
    ("lambdas", "issue #70"),
    ("higher-order-functions", "issue #70"),
    ("regex", "issue #71"),
    ("function-assert", "issue #72"),
    ("function-eval", "issue #73"),
    ("sorting", "issue #74"),
    ("hof-single", "issue #76"),
    ("tail-recursion", "needs lambdas, issue #70"),
    ("function-signatures", "issue #77"),
];

const KNOWN_CASES: &[(&str, &[&str], &str)] = &[
    ("inclusion-operator", &["case004", "case005"], "unparsable use of 'in'"),
    (
        "object-constructor",
        &[
            "case008", "case009", "case010", "case011", "case012", "case013", "case014", "case015",
            "case016", "case017", "case018", "case019", "case020", "case022", "case025",
        ],
        "issue #43 object construction",
    ),
    ("object-constructor", &["case023"], "issue #56 closures"),
    ("flattening", &["case040", "case041"], "issue #78"),
    (
        "flattening",
        &[
            "case034",
            "case037",
            "case038",
            "case042",
            "case043",
            "case044",
            "case045",
            "sequence-of-arrays-3",
        ],
        "issue #113",
    ),
    ("joins", &["employee-map-reduce-11", "library-joins-10"], "issue #48 @ references"),
    ("joins", &["index-15"], "issue #50 # references"),
    ("function-fromMillis", &["isoWeekDate-18"], "issue #52"),
    ("function-application", &["case016"], "issue #53"),
    ("function-applications", &["case012", "case016", "case021"], "issue #53"),
    (
        "function-applications",
        &["case005", "case009", "case015"],
        "issue #61 variable to function chain",
    ),
    (
        "function-applications",
        &["case013", "case014", "case017", "case018", "case019"],
        "issue #70",
    ),
    ("hof-map", &["case008"], "issue #53"),
    ("hof-map", &["case003", "case004"], "issue #70"),
    ("range-operator", &["case021", "case024"], "issue #54 timeouts"),
    (
        "boolean-expresssions",
        &["case012", "case013", "case014", "case015"],
        "issue #55 standalone and/or",
    ),
    ("boolean-expresssions", &["case016"], "issue #80 flattening"),
    (
        "errors",
        &["case012", "case013", "case014", "case015", "case018", "case020", "case022", "case023"],
        "issue #59",
    ),
    ("literals", &["case006"], "result comparison"),
    ("hof-reduce", &["case001", "case009", "case010"], "issue #70"),
    ("function-typeOf", &["case011"], "issue #70"),
    ("function-sift", &["case000", "case001", "case002", "case004"], "issue #70"),
    ("function-sort", &["case010"], "issue #70"),
    ("function-each", &["case000"], "issue #70"),
    ("hof-filter", &["case000", "case001"], "issue #70"),
    ("predicates", &["case003"], "issue #78"),
    ("encoding", &["case001", "case003"], "issue #95"),
];

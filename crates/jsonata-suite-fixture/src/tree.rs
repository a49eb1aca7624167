//! Group/case tree

use crate::fixture::{resolve_fixture, Case, FixtureContext};
use crate::layout::{json_files, subdirectories};
use crate::{Datasets, FixtureError, Result, SuiteLayout};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A group directory and its resolved cases, in file name order
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub dir: PathBuf,
    pub cases: Vec<Case>,
}

impl Group {
    /// Resolve every `*.json` fixture of a group directory
    pub fn load(name: impl Into<String>, dir: impl Into<PathBuf>, datasets: &Datasets) -> Result<Self> {
        let mut group = Self {
            name: name.into(),
            dir: dir.into(),
            cases: Vec::new(),
        };

        for (case_name, path) in json_files(&group.dir)? {
            let value = read_fixture(&path)?;
            let ctx = FixtureContext {
                group: &group.name,
                group_dir: &group.dir,
                datasets,
            };
            let cases = resolve_fixture(value, &case_name, ctx)?;
            group.cases.extend(cases);
        }

        log::debug!("Loaded group {} with {} cases", group.name, group.cases.len());
        Ok(group)
    }
}

fn read_fixture(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| FixtureError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| FixtureError::json(path, e))
}

/// Every group of a suite, in directory name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteTree {
    pub groups: Vec<Group>,
}

impl SuiteTree {
    /// Load datasets, then every group of the suite.
    ///
    /// Fails on the first fixture error; no partial tree is returned.
    pub fn load(layout: &SuiteLayout) -> Result<Self> {
        let datasets = Datasets::load(&layout.datasets_dir())?;
        Self::build(&layout.groups_dir(), &datasets)
    }

    /// Build the tree from a groups directory and already loaded datasets
    pub fn build(groups_dir: &Path, datasets: &Datasets) -> Result<Self> {
        let groups = subdirectories(groups_dir)?
            .into_iter()
            .map(|(name, dir)| Group::load(name, dir, datasets))
            .collect::<Result<Vec<_>>>()?;

        let tree = Self { groups };
        log::info!(
            "Read {} groups with {} cases from {}",
            tree.groups.len(),
            tree.case_count(),
            groups_dir.display()
        );
        Ok(tree)
    }

    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Keep the cases for which `keep(group, case)` holds; groups left empty are dropped
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Case) -> bool) {
        for group in &mut self.groups {
            let name = group.name.as_str();
            group.cases.retain(|case| keep(name, case));
        }
        self.groups.retain(|g| !g.cases.is_empty());
    }
}

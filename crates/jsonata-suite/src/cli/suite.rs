//! Suite and skip configuration loading shared by the commands

use anyhow::{Context, Result};
use jsonata_suite_fixture::{SkipRegistry, SuiteLayout, SuiteTree};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Where the suite lives and which cases to keep
pub struct SuiteOptions {
    pub root: PathBuf,
    pub skip_config: Option<PathBuf>,
    pub no_known_issues: bool,
    pub filter: Option<String>,
}

impl SuiteOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skip_config: None,
            no_known_issues: false,
            filter: None,
        }
    }

    /// Known issues (unless disabled) merged with the skip configuration file
    pub fn skip_registry(&self) -> Result<SkipRegistry> {
        let mut registry = if self.no_known_issues {
            SkipRegistry::new()
        } else {
            SkipRegistry::known_issues()
        };

        if let Some(path) = &self.skip_config {
            let config = SkipRegistry::load(path)
                .with_context(|| format!("Failed to load skip configuration: {}", path.display()))?;
            registry.merge(config);
        }

        log::debug!(
            "Skipping {} groups and {} cases",
            registry.group_count(),
            registry.case_count()
        );
        Ok(registry)
    }

    /// Load the suite tree, keeping only cases whose `group/case` name matches the filter
    pub fn load_tree(&self) -> Result<SuiteTree> {
        let filter = self
            .filter
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("Invalid --filter pattern")?;

        let mut tree = load_tree(&self.root)?;
        if let Some(filter) = filter {
            tree.retain(|group, case| filter.is_match(&format!("{}/{}", group, case.name)));
            log::info!("Filter kept {} cases", tree.case_count());
        }
        Ok(tree)
    }
}

fn load_tree(root: &Path) -> Result<SuiteTree> {
    if !root.is_dir() {
        anyhow::bail!("Suite root is not a directory: {}", root.display());
    }
    SuiteTree::load(&SuiteLayout::new(root))
        .with_context(|| format!("Failed to load suite from {}", root.display()))
}

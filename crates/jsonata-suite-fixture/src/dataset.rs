//! Named datasets shared as evaluation input across cases

use crate::layout::json_files;
use crate::{FixtureError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Dataset name to JSON value, read-only once loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    entries: HashMap<String, Arc<Value>>,
}

impl Datasets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file of `dir`; the file stem is the dataset name.
    ///
    /// A missing directory yields no datasets. An unreadable or malformed file
    /// aborts the load.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut datasets = Self::new();
        if !dir.is_dir() {
            log::warn!("Dataset directory {} not found", dir.display());
            return Ok(datasets);
        }

        for (name, path) in json_files(dir)? {
            let content = fs::read_to_string(&path).map_err(|e| FixtureError::io(&path, e))?;
            let value: Value =
                serde_json::from_str(&content).map_err(|e| FixtureError::json(&path, e))?;
            log::trace!("Loaded dataset {}", name);
            datasets.insert(name, value);
        }

        log::info!("Read {} datasets from {}", datasets.len(), dir.display());
        log::debug!("Datasets: {}", datasets.names().join(", "));
        Ok(datasets)
    }

    /// Add a dataset. A name that is already present is replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Arc<Value>> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), Arc::new(value));
        if previous.is_some() {
            log::warn!("Dataset {} defined more than once; keeping the last one", name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Value>> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dataset names in lexicographic order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

//! Suite directory layout and sorted directory enumeration

use crate::{FixtureError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DATASETS_DIR: &str = "datasets";
const GROUPS_DIR: &str = "groups";
const FIXTURE_EXTENSION: &str = "json";

/// Location of a test suite on disk
///
/// A suite root holds `datasets/<name>.json` and `groups/<group>/<case>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteLayout {
    root: PathBuf,
}

impl SuiteLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn datasets_dir(&self) -> PathBuf {
        self.root.join(DATASETS_DIR)
    }

    pub fn groups_dir(&self) -> PathBuf {
        self.root.join(GROUPS_DIR)
    }
}

/// Entries of `dir`, sorted by file name
fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| FixtureError::io(dir, e))?;

    let mut named = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FixtureError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        named.push((name, entry.path()));
    }
    named.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(named)
}

/// `*.json` files of `dir` as (stem, path), sorted by file name
pub(crate) fn json_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|(_, path)| {
            path.is_file() && path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION)
        })
        .filter_map(|(_, path)| {
            let stem = path.file_stem()?.to_string_lossy().into_owned();
            Some((stem, path))
        })
        .collect())
}

/// Subdirectories of `dir` as (name, path), sorted by name
pub(crate) fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = SuiteLayout::new("/suite");
        assert_eq!(layout.datasets_dir(), PathBuf::from("/suite/datasets"));
        assert_eq!(layout.groups_dir(), PathBuf::from("/suite/groups"));
    }

    #[test]
    fn test_json_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["case010.json", "case002.json", "notes.txt", "expr.jsonata", "case001.json"] {
            fs::write(temp_dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

        let names: Vec<_> = json_files(temp_dir.path())
            .unwrap()
            .into_iter()
            .map(|(stem, _)| stem)
            .collect();
        assert_eq!(names, vec!["case001", "case002", "case010"]);
    }

    #[test]
    fn test_subdirectories_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["string-concat", "array-constructor", "fields"] {
            fs::create_dir(temp_dir.path().join(name)).unwrap();
        }
        fs::write(temp_dir.path().join("README.md"), "").unwrap();

        let names: Vec<_> = subdirectories(temp_dir.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["array-constructor", "fields", "string-concat"]);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = json_files(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}

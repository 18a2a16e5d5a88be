//! Removal registry: which lines to delete from which files.
//!
//! The registry is authored data. It maps a file identifier (a path relative
//! to the project root) to the set of 1-indexed line numbers to remove.
//! Entries iterate in lexicographic order of the file identifier so repeated
//! runs process files, and print them, in the same order.
//!
//! On disk it is a TOML document with a single `[removals]` table:
//!
//! ```toml
//! [removals]
//! "src/lib/netmon/topology.ts" = [272, 277, 280, 283]
//! "scripts/sync-locales.mjs" = [12, 18]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors raised while building or loading a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry {}: {source}", .path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The registry is not valid TOML or has the wrong shape.
    #[error("malformed registry: {0}")]
    Parse(#[from] toml::de::Error),
    /// A line number below 1.
    #[error("invalid line number {line} for {file}: line numbers start at 1")]
    InvalidLine {
        /// File identifier the bad number belongs to.
        file: String,
        /// The rejected value.
        line: i64,
    },
    /// A file identifier that is empty or whitespace.
    #[error("empty file identifier in registry")]
    EmptyFileId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    removals: BTreeMap<String, Vec<i64>>,
}

/// Mapping from file identifier to target line numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalRegistry {
    entries: BTreeMap<String, BTreeSet<usize>>,
}

impl RemovalRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the target lines for a file, replacing any earlier entry.
    ///
    /// Duplicate numbers collapse into one.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty identifier or a line number of 0.
    pub fn add<I>(&mut self, file: impl Into<String>, lines: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = usize>,
    {
        let file = file.into();
        if file.trim().is_empty() {
            return Err(RegistryError::EmptyFileId);
        }
        let mut set = BTreeSet::new();
        for line in lines {
            if line == 0 {
                return Err(RegistryError::InvalidLine { file, line: 0 });
            }
            set.insert(line);
        }
        self.entries.insert(file, set);
        Ok(())
    }

    /// Parse a registry from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid registry document.
    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let raw: RegistryFile = toml::from_str(content)?;
        let mut registry = Self::new();
        for (file, lines) in raw.removals {
            let mut checked = Vec::with_capacity(lines.len());
            for line in lines {
                match usize::try_from(line) {
                    Ok(n) if n > 0 => checked.push(n),
                    _ => return Err(RegistryError::InvalidLine { file, line }),
                }
            }
            registry.add(file, checked)?;
        }
        Ok(registry)
    }

    /// Load a registry file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Target lines for one file.
    #[must_use]
    pub fn get(&self, file: &str) -> Option<&BTreeSet<usize>> {
        self.entries.get(file)
    }

    /// Entries in lexicographic order of file identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<usize>)> {
        self.entries.iter().map(|(file, lines)| (file.as_str(), lines))
    }

    /// Number of files in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no file is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of target lines across all files.
    #[must_use]
    pub fn total_targets(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_lexicographic() {
        let mut registry = RemovalRegistry::new();
        registry.add("src/z.ts", [1]).unwrap();
        registry.add("api/a.ts", [2]).unwrap();
        registry.add("src/b.ts", [3]).unwrap();

        let order: Vec<&str> = registry.iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec!["api/a.ts", "src/b.ts", "src/z.ts"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [5, 3, 5, 3]).unwrap();
        assert_eq!(registry.get("a.ts").unwrap().len(), 2);
        assert_eq!(registry.total_targets(), 2);
    }

    #[test]
    fn test_add_replaces_previous_entry() {
        let mut registry = RemovalRegistry::new();
        registry.add("a.ts", [1, 2]).unwrap();
        registry.add("a.ts", [9]).unwrap();
        assert_eq!(registry.get("a.ts"), Some(&BTreeSet::from([9])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_zero_line_rejected() {
        let mut registry = RemovalRegistry::new();
        let err = registry.add("a.ts", [0]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidLine { line: 0, .. }));
    }

    #[test]
    fn test_empty_file_id_rejected() {
        let mut registry = RemovalRegistry::new();
        assert!(matches!(
            registry.add("  ", [1]),
            Err(RegistryError::EmptyFileId)
        ));
    }

    #[test]
    fn test_from_toml_str() {
        let registry = RemovalRegistry::from_toml_str(
            r#"
[removals]
"src/lib/netmon/topology.ts" = [272, 277, 280, 283]
"scripts/sync-locales.mjs" = [18, 12]
"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("scripts/sync-locales.mjs"),
            Some(&BTreeSet::from([12, 18]))
        );
        assert_eq!(registry.total_targets(), 6);
    }

    #[test]
    fn test_from_toml_negative_line() {
        let err = RemovalRegistry::from_toml_str("[removals]\n\"a.ts\" = [3, -1]\n").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidLine { line: -1, .. }));
        assert!(err.to_string().contains("a.ts"));
    }

    #[test]
    fn test_from_toml_unknown_table_rejected() {
        let err = RemovalRegistry::from_toml_str("[removal]\n\"a.ts\" = [3]\n").unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn test_from_toml_empty_document() {
        let registry = RemovalRegistry::from_toml_str("").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = RemovalRegistry::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, RegistryError::Read { .. }));
    }
}

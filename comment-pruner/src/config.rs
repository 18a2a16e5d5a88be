use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_FILENAME;

/// Errors raised while loading `.comment-pruner.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML or has unknown keys.
    #[error("malformed config {}: {source}", .path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default, rename = "comment-pruner")]
    /// The `[comment-pruner]` section.
    pub pruner: PrunerConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` when running on defaults.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
/// Configuration options for the pruner. Every key is optional.
pub struct PrunerConfig {
    /// Registry file, relative to the config file's directory.
    pub registry: Option<PathBuf>,
    /// Prefixes accepted as the start of a comment line.
    pub comment_markers: Option<Vec<String>>,
    /// Longest blank run kept after removal.
    pub max_blank_lines: Option<usize>,
    /// Characters of a rejected line shown in warnings.
    pub preview_chars: Option<usize>,
}

impl Config {
    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// Returns the defaults when no config file exists in `path` or any of its
    /// ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if the nearest config file cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut current = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Self::load_file(&candidate);
            }
            if !current.pop() {
                break;
            }
        }

        Ok(Config::default())
    }

    /// Loads one config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_file_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Registry path from the config, resolved against the config file's directory.
    #[must_use]
    pub fn registry_path(&self) -> Option<PathBuf> {
        let registry = self.pruner.registry.as_ref()?;
        if registry.is_absolute() {
            return Some(registry.clone());
        }
        let base = self
            .config_file_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        Some(base.join(registry))
    }
}

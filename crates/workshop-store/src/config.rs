//! # Configuration
//!
//! Store configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables, and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `WORKSHOP_DATA_DIR`, `WORKSHOP_OBFUSCATE`, etc.
//! 2. **Config file**: the optional TOML path handed to [`StoreConfig::load`].
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | `data` | Directory repository files are resolved against |
//! | `obfuscate` | `false` | Store files as XOR+base64 text (`_Obfuscated` files) |
//! | `obfuscation_key` | `42` | Single-byte XOR key |
//! | `min_similarity` | `0.7` | Threshold used by repository pattern search |
//!
//! The obfuscation mode is not process-wide: it travels into each
//! [`PersistenceEngine`](crate::store::persistence::PersistenceEngine) as
//! [`PersistenceOptions`], so engines with different modes can coexist.

use crate::error::{Result, StoreError};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OBFUSCATION_KEY: u8 = 42;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.7;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Directory repository files are resolved against.
    #[config(env = "WORKSHOP_DATA_DIR", default = "data")]
    pub data_dir: PathBuf,

    /// Whether persisted collections are obfuscated.
    #[config(env = "WORKSHOP_OBFUSCATE", default = false)]
    pub obfuscate: bool,

    /// Single-byte XOR key for the obfuscation transform.
    #[config(env = "WORKSHOP_OBFUSCATION_KEY", default = 42)]
    pub obfuscation_key: u8,

    /// Minimum similarity for repository pattern search, in `[0, 1]`.
    #[config(env = "WORKSHOP_MIN_SIMILARITY", default = 0.7)]
    pub min_similarity: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            obfuscate: false,
            obfuscation_key: DEFAULT_OBFUSCATION_KEY,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

impl StoreConfig {
    /// Load configuration from the environment, an optional TOML file, and defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let config = builder
            .load()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(StoreError::Config(format!(
                "min_similarity must be within [0, 1], got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }

    /// Resolve a repository file name against `data_dir`.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn persistence_options(&self) -> PersistenceOptions {
        PersistenceOptions {
            obfuscate: self.obfuscate,
            obfuscation_key: self.obfuscation_key,
        }
    }
}

/// Per-engine persistence policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceOptions {
    pub obfuscate: bool,
    pub obfuscation_key: u8,
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self {
            obfuscate: false,
            obfuscation_key: DEFAULT_OBFUSCATION_KEY,
        }
    }
}

impl PersistenceOptions {
    pub fn regular() -> Self {
        Self::default()
    }

    pub fn obfuscated(key: u8) -> Self {
        Self {
            obfuscate: true,
            obfuscation_key: key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.obfuscate);
        assert_eq!(config.obfuscation_key, 42);
        assert_eq!(config.min_similarity, 0.7);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workshop.toml");
        fs::write(
            &path,
            "data_dir = \"/var/lib/workshop\"\nobfuscate = true\nobfuscation_key = 7\n",
        )
        .unwrap();

        let config = StoreConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/workshop"));
        assert!(config.obfuscate);
        assert_eq!(config.obfuscation_key, 7);
        assert_eq!(config.min_similarity, 0.7);
    }

    #[test]
    fn test_validate_rejects_out_of_range_similarity() {
        let config = StoreConfig {
            min_similarity: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_persistence_options_from_config() {
        let config = StoreConfig {
            obfuscate: true,
            obfuscation_key: 9,
            ..Default::default()
        };
        assert_eq!(
            config.persistence_options(),
            PersistenceOptions::obfuscated(9)
        );
    }

    #[test]
    fn test_path_for_joins_data_dir() {
        let config = StoreConfig {
            data_dir: PathBuf::from("/tmp/shop"),
            ..Default::default()
        };
        assert_eq!(
            config.path_for("clients.json"),
            PathBuf::from("/tmp/shop/clients.json")
        );
    }
}

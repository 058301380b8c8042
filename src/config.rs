use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{LedgerError, Result};
use crate::repository::JsonFileRepository;
use crate::types::{DEFAULT_CREATED_BY, DEFAULT_STATUS};

/// default configuration used when no file is given
pub const DEFAULT_CONFIG: &str = r#"
[store]
path = "data/db.json"

[defaults]
status = "active"
created_by = "system"
"#;

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub defaults: LedgerDefaults,
}

/// where the JSON store lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// values filled in when a request leaves them out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDefaults {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_created_by")]
    pub created_by: String,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn default_created_by() -> String {
    DEFAULT_CREATED_BY.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/db.json"),
        }
    }
}

impl Default for LedgerDefaults {
    fn default() -> Self {
        Self {
            status: default_status(),
            created_by: default_created_by(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            defaults: LedgerDefaults::default(),
        }
    }
}

impl LedgerConfig {
    /// parse from a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| LedgerError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    /// load from a TOML file, falling back to the embedded defaults if it is missing
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Self::from_toml_str(DEFAULT_CONFIG);
        }

        info!(path = %path.display(), "loading config");
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// store config for a given file, keeping default values
    pub fn with_store_path(path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig { path: path.into() },
            ..Self::default()
        }
    }

    /// open the JSON-file store this config points at
    pub fn open_store(&self) -> JsonFileRepository {
        JsonFileRepository::new(self.store.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = LedgerConfig::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.store.path, PathBuf::from("data/db.json"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = LedgerConfig::from_toml_str(
            r#"
            [defaults]
            created_by = "biuro"
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults.created_by, "biuro");
        assert_eq!(config.defaults.status, "active");
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = LedgerConfig::from_toml_str("[store]\npath = 12").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = LedgerConfig::load("/definitely/not/here/ledger.toml").unwrap();
        assert_eq!(config, LedgerConfig::default());
    }
}

//! CLI configuration
//!
//! `config.toml` in the data directory. Every section is optional; missing
//! sections take the ledger defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use soulsign::config::{DEFAULT_DECRYPT_VALIDITY_DAYS, DEFAULT_LEDGER_SALT};
use soulsign::node::NodeConfig;
use soulsign_fhe::{DEFAULT_CHAIN_ID, MAX_DECRYPT_DURATION_DAYS};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoulSignConfig {
    /// Ledger settings
    #[serde(default)]
    pub node: NodeSettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Decryption request settings
    #[serde(default)]
    pub decryption: DecryptionSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl SoulSignConfig {
    /// Load and validate `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Write as pretty TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Local development configuration for a chain
    pub fn local(chain_id: u64) -> Self {
        Self {
            node: NodeSettings {
                chain_id,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Node configuration rooted at `data_dir`
    pub fn node_config(&self, data_dir: &Path) -> NodeConfig {
        NodeConfig {
            data_dir: data_dir.to_path_buf(),
            chain_id: self.node.chain_id,
            max_decrypt_duration_days: self.decryption.max_duration_days,
            ledger_salt: self.node.ledger_salt.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.node.ledger_salt.is_empty() {
            return Err(ConfigError::Invalid("Ledger salt must not be empty".to_string()));
        }

        if self.decryption.max_duration_days == 0 {
            return Err(ConfigError::Invalid(
                "Maximum decryption duration must be greater than 0".to_string(),
            ));
        }

        if self.decryption.validity_days == 0 || self.decryption.validity_days > self.decryption.max_duration_days {
            return Err(ConfigError::Invalid(format!(
                "Decryption validity must be 1..={} days",
                self.decryption.max_duration_days
            )));
        }

        Ok(())
    }
}

/// Ledger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Chain id handles are bound to
    pub chain_id: u64,

    /// Salt the ledger address is derived from
    pub ledger_salt: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            ledger_salt: DEFAULT_LEDGER_SALT.to_string(),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Data directory override
    pub data_dir: Option<PathBuf>,
}

/// Decryption request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptionSettings {
    /// Validity of requests this CLI signs
    pub validity_days: u32,

    /// Longest validity the engine accepts
    pub max_duration_days: u32,
}

impl Default for DecryptionSettings {
    fn default() -> Self {
        Self {
            validity_days: DEFAULT_DECRYPT_VALIDITY_DAYS,
            max_duration_days: MAX_DECRYPT_DURATION_DAYS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,

    /// Output format (text, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Platform data directory, `.soulsign` when none is known
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "soulsign", "soulsign")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".soulsign"))
}

pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = SoulSignConfig::default();
        assert_eq!(config.node.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(config.decryption.validity_days, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = SoulSignConfig::local(1337);
        config.save(&path).unwrap();

        let loaded = SoulSignConfig::load(&path).unwrap();
        assert_eq!(loaded.node.chain_id, 1337);
        assert_eq!(loaded.logging.format, "text");
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[node]\nchain_id = 5\nledger_salt = \"x\"\n").unwrap();

        let loaded = SoulSignConfig::load(&path).unwrap();
        assert_eq!(loaded.node.chain_id, 5);
        assert_eq!(loaded.decryption.max_duration_days, MAX_DECRYPT_DURATION_DAYS);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let config = SoulSignConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.node.chain_id, DEFAULT_CHAIN_ID);
    }

    #[test]
    fn test_invalid_validity() {
        let config = SoulSignConfig {
            decryption: DecryptionSettings {
                validity_days: 400,
                max_duration_days: 365,
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}

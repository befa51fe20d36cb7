//! CLI configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ProjectHub CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding the key-value files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("projecthub"))
        .unwrap_or_else(|| PathBuf::from(".projecthub"))
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let mut config = match Self::find_config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        // Environment takes precedence over the file
        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("PROJECTHUB_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(level) = var("PROJECTHUB_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let locations = [
            PathBuf::from("projecthub.toml"),
            dirs::config_dir()
                .map(|p| p.join("projecthub").join("config.toml"))
                .unwrap_or_default(),
        ];

        locations.into_iter().find(|p| p.is_file())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, "warn");
        assert!(config.data_dir.ends_with("projecthub") || config.data_dir.ends_with(".projecthub"));
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projecthub.toml");
        std::fs::write(&path, "data_dir = \"/srv/hub\"\nlog_level = \"debug\"\n").unwrap();

        let mut config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/hub"));
        assert_eq!(config.log_level, "debug");

        config.apply_env(|key| (key == "PROJECTHUB_LOG_LEVEL").then(|| "trace".to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/hub"));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projecthub.toml");
        std::fs::write(&path, "log_level = \"info\"\n").unwrap();

        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projecthub.toml");
        std::fs::write(&path, "log_level = [").unwrap();

        assert!(matches!(
            CliConfig::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}

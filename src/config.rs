//! Configuration Module - settings from ~/.config/lz-workshop/config.toml
//!
//! Supports:
//! - Document directory for analysis
//! - Answer oracle endpoint and credentials (env-overridable)
//! - Workshop tuning (confidence threshold, auto-save cadence)
//! - Session snapshot directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variables that override file settings
pub const ENV_ORACLE_ENDPOINT: &str = "LZ_WORKSHOP_ORACLE_ENDPOINT";
pub const ENV_ORACLE_API_KEY: &str = "LZ_WORKSHOP_ORACLE_API_KEY";
pub const ENV_DOCS_DIR: &str = "LZ_WORKSHOP_DOCS_DIR";

/// Raised at startup when required settings are absent
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingSettings(Vec<String>),
}

/// LZ Workshop configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Document store settings
    pub documents: DocumentsConfig,
    /// Answer oracle settings
    pub oracle: OracleConfig,
    /// Workshop behavior
    pub workshop: WorkshopConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Where uploaded documents live
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Directory of documents to analyze
    pub root: Option<PathBuf>,
}

/// Answer oracle (chat-completion endpoint) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// OpenAI-compatible base URL (e.g. http://localhost:1234/v1)
    pub endpoint: Option<String>,
    /// Model/deployment name
    pub model: String,
    /// Bearer token; prefer the environment variable
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 500,
            timeout_secs: 60,
        }
    }
}

/// Workshop behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkshopConfig {
    /// Auto-accept extraction candidates at or above this confidence
    pub confidence_threshold: f64,
    /// Checkpoint after every Nth recorded answer (0 = disabled)
    pub auto_save_interval: usize,
    /// Directory for session snapshots (default: platform data dir)
    pub session_dir: Option<PathBuf>,
    /// Narrow extraction context with the search index
    pub use_search_index: bool,
    /// Snippets fetched per question
    pub search_top_k: usize,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.85,
            auto_save_interval: 5,
            session_dir: None,
            use_search_index: true,
            search_top_k: 3,
        }
    }
}

impl Config {
    /// Load config from the default path (or defaults when absent), then
    /// apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::default_path()).unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }

    /// Environment variables win over file settings
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var(ENV_ORACLE_ENDPOINT) {
            if !endpoint.is_empty() {
                self.oracle.endpoint = Some(endpoint);
            }
        }
        if let Ok(api_key) = std::env::var(ENV_ORACLE_API_KEY) {
            if !api_key.is_empty() {
                self.oracle.api_key = Some(api_key);
            }
        }
        if let Ok(docs) = std::env::var(ENV_DOCS_DIR) {
            if !docs.is_empty() {
                self.documents.root = Some(PathBuf::from(docs));
            }
        }
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("io", "lz-tools", "lz-workshop")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".lz-workshop")
                    .join("config.toml")
            })
    }

    /// Resolved snapshot directory
    pub fn session_dir(&self) -> Option<PathBuf> {
        self.workshop.session_dir.clone()
    }

    /// Check that everything document analysis needs is present.
    ///
    /// Fatal at startup: every missing setting is named so the operator
    /// can fix the configuration in one pass.
    pub fn validate_for_analysis(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.documents.root.is_none() {
            missing.push(format!("documents.root (or {ENV_DOCS_DIR})"));
        }
        if self.oracle.endpoint.is_none() {
            missing.push(format!("oracle.endpoint (or {ENV_ORACLE_ENDPOINT})"));
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingSettings(missing))
        }
    }
}

/// Generate a sample config file with comments
pub fn generate_sample_config() -> String {
    r#"# LZ Workshop Configuration
# Location: ~/.config/lz-workshop/config.toml

[general]
# Log level: trace, debug, info, warn, error
log_level = "info"

[documents]
# Directory of uploaded documents to analyze
# root = "/home/user/discovery-docs"

[oracle]
# OpenAI-compatible chat endpoint used for answer extraction
# endpoint = "http://localhost:1234/v1"

# Model or deployment name
model = "gpt-4o-mini"

# API key (prefer the LZ_WORKSHOP_ORACLE_API_KEY environment variable)
# api_key = ""

temperature = 0.2
max_tokens = 500
timeout_secs = 60

[workshop]
# Auto-accept extracted answers at or above this confidence
confidence_threshold = 0.85

# Auto-save a snapshot every N recorded answers (0 = disabled)
auto_save_interval = 5

# Where session snapshots are stored (default: platform data dir)
# session_dir = "/home/user/.lz-workshop/sessions"

# Narrow extraction context with the built-in search index
use_search_index = true

# Snippets fetched per question
search_top_k = 3
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.workshop.confidence_threshold, 0.85);
        assert_eq!(config.workshop.auto_save_interval, 5);
        assert!(config.workshop.use_search_index);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_config.toml");

        let mut config = Config::default();
        config.documents.root = Some(PathBuf::from("/tmp/docs"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.documents.root, config.documents.root);
        assert_eq!(
            loaded.workshop.confidence_threshold,
            config.workshop.confidence_threshold
        );
    }

    #[test]
    fn test_parse_sample_config() {
        let sample = generate_sample_config();
        let _config: Config = toml::from_str(&sample).unwrap();
    }

    #[test]
    fn test_validation_names_missing_settings() {
        let config = Config::default();
        let err = config.validate_for_analysis().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("documents.root"));
        assert!(message.contains("oracle.endpoint"));

        let mut config = Config::default();
        config.documents.root = Some(PathBuf::from("/tmp/docs"));
        config.oracle.endpoint = Some("http://localhost:1234/v1".to_string());
        assert!(config.validate_for_analysis().is_ok());
    }
}

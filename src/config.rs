//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//! Credentials are not part of this file; see [`crate::credentials`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::credentials::CredentialStore;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubApiConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub REST API settings
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubApiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// No timeout unless set
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    format!("gitfit/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GitHubApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

/// Where the credential object is kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    pub file: Option<String>,
}

impl CredentialsConfig {
    /// Credential store at the configured path or the default one
    pub fn store(&self) -> CredentialStore {
        match &self.file {
            Some(path) => CredentialStore::new(path),
            None => CredentialStore::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("gitfit").join("config.toml")),
            Some(PathBuf::from("/etc/gitfit/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GITFIT_API_URL") {
            self.github.api_url = url;
        }
        if let Some(file) = lookup("GITFIT_CREDENTIALS_FILE") {
            self.credentials.file = Some(file);
        }
        if let Some(level) = lookup("GITFIT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GITFIT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# gitfit Configuration
#
# Environment variables override these settings:
# - GITFIT_API_URL
# - GITFIT_CREDENTIALS_FILE
# - GITFIT_LOG_LEVEL
# - GITFIT_LOG_FORMAT
#
# The GitHub token, owner and repository are not stored here.
# Run `gitfit setup` to validate and store them.

[github]
# GitHub REST API base URL (change for GitHub Enterprise)
api_url = "https://api.github.com"

# Request timeout in seconds (unset = no timeout)
# request_timeout_secs = 30

[credentials]
# Override the credential file location
# file = "~/.config/gitfit/fitness_tracker_gh_config.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"

# Optional log file path (default: stderr)
# file = "/tmp/gitfit.log"
"#
    .to_string()
}

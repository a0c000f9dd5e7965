//! Runtime configuration.
//!
//! [`RuntimeConfig`] is read from a TOML table, from environment variables,
//! or built in code with [`Default`] and the `with_*` builders:
//!
//! ```toml
//! default_namespace = "user"
//! log_level = "debug"
//! install_log_subscriber = true
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

/// Environment variable overriding [`RuntimeConfig::default_namespace`]
pub const ENV_NAMESPACE: &str = "CALLTRON_NAMESPACE";

/// Environment variable overriding [`RuntimeConfig::log_level`]
pub const ENV_LOG: &str = "CALLTRON_LOG";

/// Errors produced while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown log level: {0}")]
    InvalidLogLevel(String),
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Namespace for vars interned without an explicit one
    pub default_namespace: String,
    /// Maximum tracing level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Whether creating a runtime installs the stderr subscriber
    pub install_log_subscriber: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_namespace: "user".to_string(),
            log_level: "warn".to_string(),
            install_log_subscriber: false,
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.level()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults overridden by `CALLTRON_NAMESPACE` and `CALLTRON_LOG`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env()
    }

    /// Apply environment overrides on top of `self`
    pub fn merge_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(namespace) = std::env::var(ENV_NAMESPACE) {
            self.default_namespace = namespace;
        }
        if let Ok(level) = std::env::var(ENV_LOG) {
            self.log_level = level;
        }
        self.level()?;
        Ok(self)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Install the stderr subscriber when a runtime is created
    pub fn with_log_subscriber(mut self) -> Self {
        self.install_log_subscriber = true;
        self
    }

    /// Parsed tracing level
    pub fn level(&self) -> Result<Level, ConfigError> {
        Level::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

/// Install a `tracing_subscriber::fmt` subscriber writing to stderr.
///
/// Returns `false` when another global subscriber is already installed.
pub fn init_tracing(config: &RuntimeConfig) -> Result<bool, ConfigError> {
    let level = config.level()?;
    Ok(tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}

//! Application configuration.
//!
//! Loaded from an optional TOML file; every section and key may be omitted.
//!
//! ```toml
//! [client]
//! backend  = "http"                   # or "memory"
//! base_url = "http://localhost:5001"
//!
//! [timeouts]
//! create_secs = 10
//! upload_secs = 60
//!
//! [log]
//! level   = "debug"
//! file    = "loan-intake.log"
//! console = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use loan_core::client::ClientConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::submission::DEFAULT_CREATE_TIMEOUT;
use crate::upload::DEFAULT_UPLOAD_TIMEOUT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client-side deadlines for backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub create_secs: u64,
    pub upload_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            create_secs: DEFAULT_CREATE_TIMEOUT.as_secs(),
            upload_secs: DEFAULT_UPLOAD_TIMEOUT.as_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn create(&self) -> Duration {
        Duration::from_secs(self.create_secs)
    }

    pub fn upload(&self) -> Duration {
        Duration::from_secs(self.upload_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when unset.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
    /// Log to stderr.
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: None,
            file: None,
            console: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub timeouts: TimeoutConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

//! Store configuration via `jstore.toml`
//!
//! A data directory opened with [`crate::Store::open_dir`] carries a
//! `jstore.toml`. On first open a commented default is written; to change
//! settings, edit the file and reopen.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use jstore_core::{Error, Result};

/// Config file name placed in the data directory.
pub const CONFIG_FILE_NAME: &str = "jstore.toml";

/// Storage key the document is persisted under unless configured otherwise.
pub const DEFAULT_KEY: &str = "__JSTORE__";

/// Deferred facade delay unless configured otherwise.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Store configuration loaded from `jstore.toml`.
///
/// # Example
///
/// ```toml
/// key = "__JSTORE__"
/// delay_ms = 1000
/// sync_writes = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage slot key holding the document.
    #[serde(default = "default_key")]
    pub key: String,
    /// Delay before a deferred call runs, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Fsync the slot file on every write.
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_sync_writes() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            delay_ms: default_delay_ms(),
            sync_writes: default_sync_writes(),
        }
    }
}

impl StoreConfig {
    /// Delay as a `Duration`
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the key is blank.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::Config("key must not be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# jstore configuration
#
# Storage key the document is persisted under
key = "__JSTORE__"

# Delay before a deferred (async) call runs, in milliseconds
delay_ms = 1000

# Fsync the document file on every write
#   true  = durable across power loss, slower writes
#   false = leave flushing to the OS
sync_writes = true
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: StoreConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        tracing::debug!(target: "jstore::config", path = %path.display(), key = %config.key, "Config loaded");
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

//! Configuration management for the socnet CLI
//!
//! Settings come from, in increasing priority: built-in defaults, a `.env`
//! file, environment variables, then command-line flags.

use crate::error::{CliError, Result};
use socnet_ingest::IngestConfig;
use socnet_store::SqliteConnector;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Default database file when neither `--db` nor `SOCNET_DB_PATH` is set
pub const DEFAULT_DB_PATH: &str = "social_network.db";

/// Default SQLite busy timeout in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 30_000;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database file
    pub db_path: PathBuf,

    /// How long a connection waits on a locked database
    pub busy_timeout_ms: u64,

    /// Loader settings
    pub ingest: IngestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            ingest: IngestConfig::default(),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            ingest: IngestConfig::from_env()?,
            ..Self::default()
        };

        if let Ok(path) = std::env::var("SOCNET_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Ok(timeout) = std::env::var("SOCNET_BUSY_TIMEOUT_MS") {
            config.busy_timeout_ms = timeout.parse().map_err(|_| {
                CliError::config(format!("SOCNET_BUSY_TIMEOUT_MS is not a number: {timeout}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(CliError::config("Database path cannot be empty"));
        }
        self.ingest.validate()?;
        Ok(())
    }

    /// Override the database path
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    /// Get busy timeout as Duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Connector for the configured database
    pub fn connector(&self) -> SqliteConnector {
        SqliteConnector::new(&self.db_path).with_busy_timeout(self.busy_timeout())
    }
}

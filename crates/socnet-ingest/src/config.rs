//! Import configuration
//!
//! Chunk sizes and worker settings, loaded from environment variables.

use serde::{Deserialize, Serialize};
use socnet_common::Collection;
use std::str::FromStr;
use std::time::Duration;

/// Default slice size for chunked account imports
pub const DEFAULT_USER_CHUNK_SIZE: usize = 100;

/// Default slice size for chunked status imports
pub const DEFAULT_STATUS_CHUNK_SIZE: usize = 10_000;

/// Default slice size for parallel account imports
pub const DEFAULT_PARALLEL_USER_CHUNK_SIZE: usize = 500;

/// Default slice size for parallel status imports
pub const DEFAULT_PARALLEL_STATUS_CHUNK_SIZE: usize = 50_000;

/// How long the coordinator waits for its workers (5 minutes)
pub const DEFAULT_WORKER_TIMEOUT_SECS: u64 = 300;

/// How a parallel worker writes its slice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStrategy {
    /// One single-document insert per row
    #[default]
    RowByRow,
    /// One unordered bulk insert per slice
    Bulk,
}

impl FromStr for WorkerStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "row" | "row_by_row" | "row-by-row" => Ok(WorkerStrategy::RowByRow),
            "bulk" => Ok(WorkerStrategy::Bulk),
            other => anyhow::bail!("Invalid worker strategy: {}. Must be 'row' or 'bulk'", other),
        }
    }
}

impl std::fmt::Display for WorkerStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WorkerStrategy::RowByRow => "row",
            WorkerStrategy::Bulk => "bulk",
        })
    }
}

/// Loader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    pub user_chunk_size: usize,
    pub status_chunk_size: usize,
    pub parallel_user_chunk_size: usize,
    pub parallel_status_chunk_size: usize,
    pub worker_timeout_secs: u64,
    pub strategy: WorkerStrategy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            user_chunk_size: DEFAULT_USER_CHUNK_SIZE,
            status_chunk_size: DEFAULT_STATUS_CHUNK_SIZE,
            parallel_user_chunk_size: DEFAULT_PARALLEL_USER_CHUNK_SIZE,
            parallel_status_chunk_size: DEFAULT_PARALLEL_STATUS_CHUNK_SIZE,
            worker_timeout_secs: DEFAULT_WORKER_TIMEOUT_SECS,
            strategy: WorkerStrategy::default(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from `SOCNET_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            user_chunk_size: env_or("SOCNET_USER_CHUNK_SIZE", DEFAULT_USER_CHUNK_SIZE),
            status_chunk_size: env_or("SOCNET_STATUS_CHUNK_SIZE", DEFAULT_STATUS_CHUNK_SIZE),
            parallel_user_chunk_size: env_or(
                "SOCNET_PARALLEL_USER_CHUNK_SIZE",
                DEFAULT_PARALLEL_USER_CHUNK_SIZE,
            ),
            parallel_status_chunk_size: env_or(
                "SOCNET_PARALLEL_STATUS_CHUNK_SIZE",
                DEFAULT_PARALLEL_STATUS_CHUNK_SIZE,
            ),
            worker_timeout_secs: env_or("SOCNET_WORKER_TIMEOUT_SECS", DEFAULT_WORKER_TIMEOUT_SECS),
            strategy: match std::env::var("SOCNET_WORKER_STRATEGY") {
                Ok(s) => s.parse()?,
                Err(_) => WorkerStrategy::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.user_chunk_size == 0 {
            anyhow::bail!("SOCNET_USER_CHUNK_SIZE must be greater than 0");
        }
        if self.status_chunk_size == 0 {
            anyhow::bail!("SOCNET_STATUS_CHUNK_SIZE must be greater than 0");
        }
        if self.parallel_user_chunk_size == 0 {
            anyhow::bail!("SOCNET_PARALLEL_USER_CHUNK_SIZE must be greater than 0");
        }
        if self.parallel_status_chunk_size == 0 {
            anyhow::bail!("SOCNET_PARALLEL_STATUS_CHUNK_SIZE must be greater than 0");
        }
        if self.worker_timeout_secs == 0 {
            anyhow::bail!("SOCNET_WORKER_TIMEOUT_SECS must be greater than 0");
        }
        Ok(())
    }

    /// Slice size for the chunked loader
    pub fn chunk_size(&self, collection: Collection) -> usize {
        match collection {
            Collection::Users => self.user_chunk_size,
            Collection::Statuses => self.status_chunk_size,
        }
    }

    /// Slice size for the parallel loader
    pub fn parallel_chunk_size(&self, collection: Collection) -> usize {
        match collection {
            Collection::Users => self.parallel_user_chunk_size,
            Collection::Statuses => self.parallel_status_chunk_size,
        }
    }

    /// Get worker timeout as Duration
    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_secs)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

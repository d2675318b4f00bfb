//! Social Network Bulk Import
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! CSV loaders for user accounts and status updates.
//!
//! # Loaders
//!
//! - [`load_sequential`]: one pass, one insert per row
//! - [`load_in_chunks`]: bounded slices, one unordered bulk insert per slice
//! - [`ParallelLoader`]: one blocking worker per slice, each with a private
//!   store connection
//!
//! Every loader validates the header before touching the store, skips
//! rows it cannot import, and returns an [`ImportReport`] listing them.
//! Status rows are only imported when their owning user already exists.
//!
//! # Example
//!
//! ```no_run
//! use socnet_common::{StatusUpdate, UserAccount};
//! use socnet_ingest::{load_in_chunks, ParallelLoader};
//! use socnet_store::{SqliteConnector, StoreConnector};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let connector = SqliteConnector::new("social_network.db");
//!
//!     let store = connector.connect()?;
//!     let report = load_in_chunks::<UserAccount, _>(&store, "accounts.csv".as_ref(), 100)?;
//!     println!("{report}");
//!
//!     let report = ParallelLoader::new(connector)
//!         .load::<StatusUpdate>("status_updates.csv".as_ref(), 50_000)
//!         .await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod chunked;
pub mod config;
pub mod error;
pub mod guard;
pub mod importer;
pub mod mapper;
pub mod parallel;
pub mod reader;
pub mod report;
pub mod sequential;

// Re-export commonly used types
pub use chunked::load_in_chunks;
pub use config::{IngestConfig, WorkerStrategy};
pub use error::{ImportError, Result};
pub use importer::Importer;
pub use mapper::{Importable, MalformedRow, SchemaMapper};
pub use parallel::ParallelLoader;
pub use reader::{Chunk, ChunkReader, RawRow};
pub use report::{FailureKind, ImportReport, LoadMode, RowFailure, WorkerFailure, WorkerFailureKind};
pub use sequential::load_sequential;

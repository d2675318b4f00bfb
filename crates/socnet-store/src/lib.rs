//! Social Network Record Store
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Document storage for user accounts and status updates.
//!
//! # Overview
//!
//! - [`RecordStore`]: the document-store contract the loaders and the CLI
//!   consume (point lookups, single and unordered bulk insert, update,
//!   delete, filtered delete and count)
//! - [`StoreConnector`]: opens a fresh, private connection; every parallel
//!   import worker calls it once
//! - [`SqliteStore`] / [`SqliteConnector`]: the SQLite implementation, one
//!   table per collection with the document id as primary key
//! - [`UserAccounts`] / [`StatusUpdates`]: typed single-record operations,
//!   including the cascade delete of a user's statuses and the
//!   owner-existence check for new statuses
//!
//! # Example
//!
//! ```no_run
//! use socnet_common::UserAccount;
//! use socnet_store::{SqliteConnector, StoreConnector, UserAccounts};
//!
//! let store = SqliteConnector::new("social_network.db").connect()?;
//! let users = UserAccounts::new(&store);
//! users.add_user(&UserAccount::new("dave03", "david.yuen@gmail.com", "David", "Yuen"))?;
//! # Ok::<(), socnet_store::StoreError>(())
//! ```

pub mod accounts;
pub mod error;
pub mod filter;
pub mod sqlite;
pub mod statuses;
pub mod store;

// Re-export commonly used types
pub use accounts::UserAccounts;
pub use error::{Result, StoreError};
pub use filter::Filter;
pub use sqlite::{SqliteConnector, SqliteStore};
pub use statuses::StatusUpdates;
pub use store::{BulkWriteResult, RecordStore, StoreConnector, WriteError, WriteErrorKind};

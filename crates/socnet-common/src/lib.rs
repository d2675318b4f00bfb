//! Social Network Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the social network workspace.
//!
//! # Overview
//!
//! - **Types**: the two record kinds ([`UserAccount`], [`StatusUpdate`]),
//!   the [`Collection`] they live in and the [`Document`] shape the store persists
//! - **Error Handling**: [`SocnetError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Timing**: [`Timer`] for reporting how long an operation took
//!
//! # Example
//!
//! ```
//! use socnet_common::{Record, UserAccount};
//!
//! let user = UserAccount::new("evmiles97", "eve.miles@uw.edu", "Eve", "Miles");
//! let doc = user.to_document().unwrap();
//! assert_eq!(doc["_id"], "evmiles97");
//! ```

pub mod error;
pub mod logging;
pub mod timer;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SocnetError};
pub use timer::Timer;
pub use types::{Collection, Document, Record, StatusUpdate, UserAccount, ID_FIELD};

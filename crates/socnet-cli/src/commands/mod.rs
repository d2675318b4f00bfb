//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod clear;
pub mod load;
pub mod stats;
pub mod status;
pub mod user;

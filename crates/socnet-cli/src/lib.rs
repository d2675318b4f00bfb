//! Social Network CLI Library
//!
//! Command-line front end for the social network database.
//!
//! # Overview
//!
//! - **Bulk import**: load accounts or statuses from CSV
//!   (`socnet load-users`, `socnet load-statuses`) sequentially, in chunks
//!   or with parallel workers
//! - **Accounts**: add, update, search and delete one user (`socnet user ...`)
//! - **Statuses**: add, update, search and delete one status (`socnet status ...`)
//! - **Maintenance**: collection sizes (`socnet stats`) and wiping the
//!   database (`socnet clear`)

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// socnet - Social network database tool
#[derive(Parser, Debug)]
#[command(name = "socnet")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file
    #[arg(long, env = "SOCNET_DB_PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Print the command reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import user accounts from CSV (USER_ID,EMAIL,NAME,LASTNAME)
    LoadUsers(LoadArgs),

    /// Import status updates from CSV (STATUS_ID,USER_ID,STATUS_TEXT)
    LoadStatuses(LoadArgs),

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Manage status updates
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },

    /// Show collection sizes
    Stats,

    /// Delete every account and status
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// How a CSV file is imported
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// One insert per row
    Sequential,
    /// One bulk insert per slice
    #[default]
    Chunked,
    /// One worker per slice
    Parallel,
}

/// How a parallel worker writes its slice
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Row,
    Bulk,
}

#[derive(clap::Args, Debug)]
pub struct LoadArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// Import mode
    #[arg(short, long, value_enum, default_value_t = ImportMode::Chunked)]
    pub mode: ImportMode,

    /// Rows per slice (defaults depend on entity and mode)
    #[arg(short, long)]
    pub chunk_size: Option<usize>,

    /// Parallel worker strategy
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Print the import report as JSON
    #[arg(long)]
    pub json: bool,
}

/// User account subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Add a new user
    Add {
        user_id: String,
        email: String,
        name: String,
        last_name: String,
    },

    /// Replace a user's email and names
    Update {
        user_id: String,
        email: String,
        name: String,
        last_name: String,
    },

    /// Show one user
    Search { user_id: String },

    /// Delete a user and all of their statuses
    Delete { user_id: String },
}

/// Status update subcommands
#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// Add a status for an existing user
    Add {
        status_id: String,
        user_id: String,
        status_text: String,
    },

    /// Replace a status's owner and text
    Update {
        status_id: String,
        user_id: String,
        status_text: String,
    },

    /// Show one status
    Search { status_id: String },

    /// Delete one status
    Delete { status_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_load_args() {
        let cli = Cli::parse_from([
            "socnet",
            "load-statuses",
            "status_updates.csv",
            "--mode",
            "parallel",
            "--chunk-size",
            "500",
            "--strategy",
            "bulk",
        ]);

        match cli.command {
            Some(Commands::LoadStatuses(args)) => {
                assert_eq!(args.mode, ImportMode::Parallel);
                assert_eq!(args.chunk_size, Some(500));
                assert_eq!(args.strategy, Some(StrategyArg::Bulk));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

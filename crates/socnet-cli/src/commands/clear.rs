//! `socnet clear` command implementation
//!
//! Removes every account and status from the database.

use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use socnet_store::{RecordStore, StoreConnector};
use std::io::{self, Write};
use tracing::info;

/// Drop all collections, asking first unless `yes` is set
pub async fn run(config: &Config, yes: bool) -> Result<()> {
    if !yes {
        println!(
            "{}",
            format!("This will delete every user and status in {}.", config.db_path.display())
                .yellow()
        );
        print!("Continue? [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        if input != "y" && input != "yes" {
            println!("Clear cancelled.");
            return Ok(());
        }
    }

    let store = config.connector().connect()?;
    store.drop_database()?;
    info!(db = %config.db_path.display(), "Database cleared");
    println!("{} Database cleared", "✓".green());

    Ok(())
}

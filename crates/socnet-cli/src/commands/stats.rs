//! `socnet stats` command implementation

use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use socnet_store::{StatusUpdates, StoreConnector, UserAccounts};

/// Show the size of each collection
pub async fn run(config: &Config) -> Result<()> {
    let store = config.connector().connect()?;

    println!("{}", "Database:".cyan().bold());
    println!("  File:     {}", config.db_path.display());
    println!("  Users:    {}", UserAccounts::new(&store).len()?);
    println!("  Statuses: {}", StatusUpdates::new(&store).len()?);

    Ok(())
}

//! `socnet status` command implementation

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::StatusCommand;
use colored::Colorize;
use socnet_common::StatusUpdate;
use socnet_store::{StatusUpdates, StoreConnector};

/// Run a status subcommand
pub async fn run(config: &Config, command: &StatusCommand) -> Result<()> {
    let store = config.connector().connect()?;
    let statuses = StatusUpdates::new(&store);

    match command {
        StatusCommand::Add {
            status_id,
            user_id,
            status_text,
        } => {
            statuses.add_status(&StatusUpdate::new(
                status_id.as_str(),
                user_id.as_str(),
                status_text.as_str(),
            ))?;
            println!("{} New status {} was successfully added", "✓".green(), status_id);
        },
        StatusCommand::Update {
            status_id,
            user_id,
            status_text,
        } => {
            statuses.update_status(status_id, user_id, status_text)?;
            println!("{} Status {} was successfully updated", "✓".green(), status_id);
        },
        StatusCommand::Search { status_id } => {
            let status = statuses
                .search_status(status_id)?
                .ok_or_else(|| CliError::StatusNotFound(status_id.clone()))?;
            println!("Status ID: {}", status.status_id);
            println!("User ID:   {}", status.user_id);
            println!("Text:      {}", status.status_text);
        },
        StatusCommand::Delete { status_id } => {
            statuses.delete_status(status_id)?;
            println!("{} Status {} was successfully deleted", "✓".green(), status_id);
        },
    }

    Ok(())
}

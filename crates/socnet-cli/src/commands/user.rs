//! `socnet user` command implementation

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::UserCommand;
use colored::Colorize;
use socnet_common::UserAccount;
use socnet_store::{StoreConnector, UserAccounts};

/// Run a user subcommand
pub async fn run(config: &Config, command: &UserCommand) -> Result<()> {
    let store = config.connector().connect()?;
    let users = UserAccounts::new(&store);

    match command {
        UserCommand::Add {
            user_id,
            email,
            name,
            last_name,
        } => {
            users.add_user(&UserAccount::new(
                user_id.as_str(),
                email.as_str(),
                name.as_str(),
                last_name.as_str(),
            ))?;
            println!("{} User {} was successfully added", "✓".green(), user_id);
        },
        UserCommand::Update {
            user_id,
            email,
            name,
            last_name,
        } => {
            users.update_user(user_id, email, name, last_name)?;
            println!("{} User {} was successfully updated", "✓".green(), user_id);
        },
        UserCommand::Search { user_id } => {
            let user = users
                .search_user(user_id)?
                .ok_or_else(|| CliError::UserNotFound(user_id.clone()))?;
            println!("User ID:   {}", user.user_id);
            println!("Email:     {}", user.email);
            println!("Name:      {}", user.name);
            println!("Last name: {}", user.last_name);
        },
        UserCommand::Delete { user_id } => {
            let statuses = users.delete_user(user_id)?;
            println!(
                "{} User {} was successfully deleted ({} status update(s) removed)",
                "✓".green(),
                user_id,
                statuses
            );
        },
    }

    Ok(())
}

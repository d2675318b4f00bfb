//! socnet CLI - Main entry point

use clap::Parser;
use colored::Colorize;
use socnet_cli::{Cli, Commands, Config};
use socnet_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use socnet_common::timer::format_seconds;
use socnet_common::{StatusUpdate, Timer, UserAccount};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command.as_ref() else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    // Verbose mode logs debug to the console, otherwise warnings only
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("socnet")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging, so a setup failure is not fatal
    let guard = init_logging(&log_config).ok();

    let result = match Config::load() {
        Ok(config) => {
            let config = config.with_db_path(cli.db.clone());
            // Timing goes to stderr so stdout carries only command output
            let timer = Timer::start(command_name(command));
            let result = execute_command(&config, command).await;
            let elapsed = timer.stop();
            if result.is_ok() {
                eprintln!(
                    "{}",
                    format!("Performance time: {} second(s)", format_seconds(elapsed)).dimmed()
                );
            }
            result
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("{} {}", "Error:".red().bold(), e);
        drop(guard);
        process::exit(1);
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::LoadUsers(_) => "load-users",
        Commands::LoadStatuses(_) => "load-statuses",
        Commands::User { .. } => "user",
        Commands::Status { .. } => "status",
        Commands::Stats => "stats",
        Commands::Clear { .. } => "clear",
    }
}

/// Execute the CLI command
async fn execute_command(config: &Config, command: &Commands) -> socnet_cli::Result<()> {
    match command {
        Commands::LoadUsers(args) => {
            socnet_cli::commands::load::run::<UserAccount>(config, args).await
        },
        Commands::LoadStatuses(args) => {
            socnet_cli::commands::load::run::<StatusUpdate>(config, args).await
        },
        Commands::User { command } => socnet_cli::commands::user::run(config, command).await,
        Commands::Status { command } => socnet_cli::commands::status::run(config, command).await,
        Commands::Stats => socnet_cli::commands::stats::run(config).await,
        Commands::Clear { yes } => socnet_cli::commands::clear::run(config, *yes).await,
    }
}

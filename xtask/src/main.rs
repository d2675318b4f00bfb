//! Build automation tasks for socnet
//!
//! Currently generates the CLI reference from the clap definitions.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for socnet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<socnet_cli::Cli>();

    let content = format!(
        r#"# socnet CLI Reference

This documentation is generated from the CLI source code. Last updated: {}.

## Overview

`socnet` loads user accounts and status updates from CSV files into a
SQLite document database, and manages single records.

## Quick Start

```bash
# Import accounts, then their statuses
socnet load-users accounts.csv
socnet load-statuses status_updates.csv --mode parallel

# Work with one record
socnet user search evmiles97
socnet status add evmiles97_00099 evmiles97 "Back from lunch"
socnet user delete evmiles97

# Collection sizes
socnet stats
```

## Input Files

- Accounts: header must include `USER_ID,EMAIL,NAME,LASTNAME`
- Statuses: header must include `STATUS_ID,USER_ID,STATUS_TEXT`

A status row is only imported when its `USER_ID` already exists. Rows that
cannot be imported are skipped and listed in the import summary.

## Commands

{}

## Environment Variables

- `SOCNET_DB_PATH` - Database file (default: `social_network.db`)
- `SOCNET_BUSY_TIMEOUT_MS` - Wait on a locked database (default: `30000`)
- `SOCNET_USER_CHUNK_SIZE` / `SOCNET_STATUS_CHUNK_SIZE` - Chunked slice sizes (default: `100` / `10000`)
- `SOCNET_PARALLEL_USER_CHUNK_SIZE` / `SOCNET_PARALLEL_STATUS_CHUNK_SIZE` - Parallel slice sizes (default: `500` / `50000`)
- `SOCNET_WORKER_TIMEOUT_SECS` - Wait for parallel workers (default: `300`)
- `SOCNET_WORKER_STRATEGY` - `row` or `bulk` (default: `row`)
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR`, `LOG_FILTER` - Logging

Variables may also be set in a `.env` file in the working directory.

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    // Create output directory if it doesn't exist
    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}

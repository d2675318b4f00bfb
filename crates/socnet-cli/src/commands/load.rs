//! `socnet load-users` / `socnet load-statuses` command implementation

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::progress::create_spinner;
use crate::{ImportMode, LoadArgs, StrategyArg};
use colored::Colorize;
use socnet_ingest::{FailureKind, ImportReport, Importable, Importer, WorkerStrategy};
use tracing::info;

/// Failed rows listed before the output is truncated
const MAX_LISTED_FAILURES: usize = 20;

/// Import a CSV file of `T` records
pub async fn run<T: Importable>(config: &Config, args: &LoadArgs) -> Result<()> {
    let mut ingest = config.ingest.clone();
    if let Some(strategy) = args.strategy {
        ingest.strategy = match strategy {
            StrategyArg::Row => WorkerStrategy::RowByRow,
            StrategyArg::Bulk => WorkerStrategy::Bulk,
        };
    }
    let importer = Importer::new(config.connector(), ingest);

    info!(
        file = %args.file.display(),
        collection = %T::COLLECTION,
        mode = ?args.mode,
        "Starting import"
    );

    let spinner = create_spinner(&format!("Importing {}...", args.file.display()));
    let result = match args.mode {
        ImportMode::Sequential => importer.sequential_blocking::<T>(&args.file).await,
        ImportMode::Chunked => {
            importer
                .chunked_blocking::<T>(&args.file, args.chunk_size)
                .await
        },
        ImportMode::Parallel => importer.parallel::<T>(&args.file, args.chunk_size).await,
    };
    spinner.finish_and_clear();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.worker_failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::ImportIncomplete(report.worker_failures.len()))
    }
}

fn print_report(report: &ImportReport) {
    println!("{}", "Import Summary:".cyan().bold());
    println!("  Collection: {}", report.collection);
    println!("  Mode:       {}", report.mode);
    println!("  Chunks:     {}", report.chunks);
    println!("  Rows read:  {}", report.rows_read);
    println!("  Inserted:   {}", report.inserted.to_string().green());

    if report.is_clean() {
        return;
    }

    println!(
        "  Skipped:    {} duplicate, {} malformed, {} orphaned",
        report.count(FailureKind::DuplicateKey),
        report.count(FailureKind::MalformedRow),
        report.count(FailureKind::OwnerNotFound),
    );

    if !report.row_failures.is_empty() {
        println!();
        println!("{}", "Skipped rows:".yellow().bold());
        for failure in report.row_failures.iter().take(MAX_LISTED_FAILURES) {
            println!(
                "  line {}: {} ({:?}) {}",
                failure.line,
                failure.key.as_deref().unwrap_or("-"),
                failure.kind,
                failure.reason
            );
        }
        if report.row_failures.len() > MAX_LISTED_FAILURES {
            println!("  ... and {} more", report.row_failures.len() - MAX_LISTED_FAILURES);
        }
    }

    for failure in &report.worker_failures {
        println!(
            "{} chunk {} ({} rows): {:?} {}",
            "✗".red(),
            failure.chunk,
            failure.rows,
            failure.kind,
            failure.reason
        );
    }
}

//! Import outcome reporting

use serde::Serialize;
use socnet_common::Collection;
use std::fmt;

/// Which loader produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    Sequential,
    Chunked,
    Parallel,
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadMode::Sequential => "sequential",
            LoadMode::Chunked => "chunked",
            LoadMode::Parallel => "parallel",
        })
    }
}

/// Why a row was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A required value was absent, or the row could not be decoded
    MalformedRow,
    /// The id already exists in the store or earlier in the same batch
    DuplicateKey,
    /// Status row referencing a user that does not exist
    OwnerNotFound,
}

/// A row that was read but not imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// 1-based line in the source file
    pub line: u64,
    /// Id of the row, when it had one
    pub key: Option<String>,
    pub kind: FailureKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerFailureKind {
    /// The worker could not open its store connection
    Connect,
    Panicked,
    /// The worker did not finish within the configured wait
    TimedOut,
    /// The store failed mid-slice
    Store,
}

/// A parallel worker that did not complete its slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerFailure {
    /// Index of the slice the worker owned
    pub chunk: usize,
    /// Rows in that slice
    pub rows: usize,
    pub kind: WorkerFailureKind,
    pub reason: String,
}

/// What one slice contributed to an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkOutcome {
    pub rows_read: u64,
    pub inserted: u64,
    pub failures: Vec<RowFailure>,
}

/// Summary of one loader call
///
/// A report is only produced when the file was found and its header was
/// valid. Skipped rows and failed workers are listed; they never abort the
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub collection: Collection,
    pub mode: LoadMode,
    /// Number of slices read
    pub chunks: usize,
    pub rows_read: u64,
    pub inserted: u64,
    pub row_failures: Vec<RowFailure>,
    pub worker_failures: Vec<WorkerFailure>,
}

impl ImportReport {
    pub fn new(collection: Collection, mode: LoadMode) -> Self {
        Self {
            collection,
            mode,
            chunks: 0,
            rows_read: 0,
            inserted: 0,
            row_failures: Vec::new(),
            worker_failures: Vec::new(),
        }
    }

    /// Fold one slice's outcome into the report
    pub fn absorb(&mut self, outcome: ChunkOutcome) {
        self.rows_read += outcome.rows_read;
        self.inserted += outcome.inserted;
        self.row_failures.extend(outcome.failures);
    }

    pub fn record_worker_failure(&mut self, failure: WorkerFailure) {
        self.rows_read += failure.rows as u64;
        self.worker_failures.push(failure);
    }

    /// Whether any row or slice was not imported
    pub fn has_write_errors(&self) -> bool {
        !self.row_failures.is_empty() || !self.worker_failures.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_write_errors()
    }

    /// Number of skipped rows of the given kind
    pub fn count(&self, kind: FailureKind) -> usize {
        self.row_failures.iter().filter(|f| f.kind == kind).count()
    }

    /// Sort failures by source position
    ///
    /// Parallel workers finish in any order; reports read better sorted.
    pub fn sort(&mut self) {
        self.row_failures.sort_by_key(|f| f.line);
        self.worker_failures.sort_by_key(|f| f.chunk);
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} rows in {} chunk(s), {} inserted, {} duplicate, {} malformed, {} orphaned",
            self.collection,
            self.mode,
            self.rows_read,
            self.chunks,
            self.inserted,
            self.count(FailureKind::DuplicateKey),
            self.count(FailureKind::MalformedRow),
            self.count(FailureKind::OwnerNotFound),
        )?;
        if !self.worker_failures.is_empty() {
            write!(f, ", {} failed worker(s)", self.worker_failures.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn failure(line: u64, kind: FailureKind) -> RowFailure {
        RowFailure {
            line,
            key: Some(format!("key{line}")),
            kind,
            reason: String::new(),
        }
    }

    #[test]
    fn test_absorb_and_flags() {
        let mut report = ImportReport::new(Collection::Users, LoadMode::Chunked);
        assert!(report.is_clean());

        report.absorb(ChunkOutcome {
            rows_read: 3,
            inserted: 3,
            failures: vec![],
        });
        assert!(report.is_clean());

        report.absorb(ChunkOutcome {
            rows_read: 2,
            inserted: 0,
            failures: vec![failure(7, FailureKind::DuplicateKey), failure(5, FailureKind::MalformedRow)],
        });

        assert_eq!(report.rows_read, 5);
        assert_eq!(report.inserted, 3);
        assert!(report.has_write_errors());
        assert_eq!(report.count(FailureKind::DuplicateKey), 1);

        report.sort();
        assert_eq!(report.row_failures[0].line, 5);
    }

    #[test]
    fn test_worker_failure_counts_as_write_error() {
        let mut report = ImportReport::new(Collection::Statuses, LoadMode::Parallel);
        report.record_worker_failure(WorkerFailure {
            chunk: 1,
            rows: 10,
            kind: WorkerFailureKind::Panicked,
            reason: "boom".to_string(),
        });

        assert!(report.has_write_errors());
        assert_eq!(report.rows_read, 10);
        assert!(report.to_string().contains("1 failed worker(s)"));
    }

    #[test]
    fn test_display() {
        let mut report = ImportReport::new(Collection::Users, LoadMode::Sequential);
        report.chunks = 1;
        report.absorb(ChunkOutcome {
            rows_read: 2,
            inserted: 1,
            failures: vec![failure(3, FailureKind::DuplicateKey)],
        });

        assert_eq!(
            report.to_string(),
            "user_collection (sequential): 2 rows in 1 chunk(s), 1 inserted, 1 duplicate, 0 malformed, 0 orphaned"
        );
    }
}

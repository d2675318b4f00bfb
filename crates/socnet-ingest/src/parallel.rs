//! Parallel loader: one blocking worker per slice
//!
//! The coordinator resolves the header, partitions the file, then hands
//! every slice to its own `spawn_blocking` task. Each task opens a private
//! store connection through the [`StoreConnector`], imports its slice and
//! reports back. The coordinator waits for all of them, bounded by the
//! worker timeout. A worker that fails to connect, hits a store error,
//! panics or overruns the timeout is reported without affecting its
//! siblings. Timed-out workers are not cancelled.

use crate::chunked::open_source;
use crate::config::{WorkerStrategy, DEFAULT_WORKER_TIMEOUT_SECS};
use crate::error::{ImportError, Result};
use crate::guard::import_chunk;
use crate::mapper::{Importable, SchemaMapper};
use crate::reader::Chunk;
use crate::report::{ChunkOutcome, ImportReport, LoadMode, WorkerFailure, WorkerFailureKind};
use socnet_store::StoreConnector;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Runs parallel imports against stores opened by `C`
pub struct ParallelLoader<C> {
    connector: Arc<C>,
    strategy: WorkerStrategy,
    worker_timeout: Duration,
}

impl<C> Clone for ParallelLoader<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            strategy: self.strategy,
            worker_timeout: self.worker_timeout,
        }
    }
}

impl<C: StoreConnector> ParallelLoader<C> {
    pub fn new(connector: C) -> Self {
        Self::from_shared(Arc::new(connector))
    }

    pub fn from_shared(connector: Arc<C>) -> Self {
        Self {
            connector,
            strategy: WorkerStrategy::default(),
            worker_timeout: Duration::from_secs(DEFAULT_WORKER_TIMEOUT_SECS),
        }
    }

    pub fn with_strategy(mut self, strategy: WorkerStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Bound on the total wait for all workers
    pub fn with_worker_timeout(mut self, timeout: Duration) -> Self {
        self.worker_timeout = timeout;
        self
    }

    /// Import a CSV file with one worker per slice of `chunk_size` rows
    ///
    /// # Errors
    ///
    /// `FileNotFound`, `InvalidChunkSize` or a failure to reach the store,
    /// all before any worker starts. Everything after that is reported in
    /// the returned [`ImportReport`].
    #[instrument(skip(self), fields(
        path = %path.display(),
        collection = %T::COLLECTION,
        strategy = %self.strategy,
        store = %self.connector.describe(),
    ))]
    pub async fn load<T: Importable>(&self, path: &Path, chunk_size: usize) -> Result<ImportReport> {
        let mut report = ImportReport::new(T::COLLECTION, LoadMode::Parallel);

        let Some((mapper, chunks)) = self.partition::<T>(path.to_path_buf(), chunk_size).await?
        else {
            info!("Empty source, nothing to import");
            return Ok(report);
        };
        report.chunks = chunks.len();

        // Schema setup happens once, before workers race for the file
        let connector = Arc::clone(&self.connector);
        run_blocking(move || connector.connect().map(drop).map_err(ImportError::from)).await?;

        info!(workers = chunks.len(), "Starting import workers");
        let deadline = Instant::now() + self.worker_timeout;
        let mapper = Arc::new(mapper);

        let workers = chunks.into_iter().map(|chunk| {
            let index = chunk.index;
            let rows = chunk.len();
            let connector = Arc::clone(&self.connector);
            let mapper = Arc::clone(&mapper);
            let strategy = self.strategy;

            let handle = tokio::task::spawn_blocking(move || {
                run_worker(connector.as_ref(), mapper.as_ref(), &chunk, strategy)
            });

            async move { (index, rows, tokio::time::timeout_at(deadline, handle).await) }
        });

        for (chunk, rows, result) in futures::future::join_all(workers).await {
            match result {
                Ok(Ok(Ok(outcome))) => {
                    debug!(chunk, inserted = outcome.inserted, "Worker finished");
                    report.absorb(outcome);
                },
                Ok(Ok(Err((kind, reason)))) => {
                    warn!(chunk, ?kind, "Worker failed: {}", reason);
                    report.record_worker_failure(WorkerFailure {
                        chunk,
                        rows,
                        kind,
                        reason,
                    });
                },
                Ok(Err(e)) => {
                    let reason = join_error_message(e);
                    error!(chunk, "Worker panicked: {}", reason);
                    report.record_worker_failure(WorkerFailure {
                        chunk,
                        rows,
                        kind: WorkerFailureKind::Panicked,
                        reason,
                    });
                },
                Err(_) => {
                    warn!(chunk, timeout = ?self.worker_timeout, "Worker timed out");
                    report.record_worker_failure(WorkerFailure {
                        chunk,
                        rows,
                        kind: WorkerFailureKind::TimedOut,
                        reason: format!("no result within {:?}", self.worker_timeout),
                    });
                },
            }
        }

        report.sort();
        info!("{}", report);
        Ok(report)
    }

    /// Read and slice the whole file off the async runtime
    async fn partition<T: Importable>(
        &self,
        path: PathBuf,
        chunk_size: usize,
    ) -> Result<Option<(SchemaMapper<T>, Vec<Chunk>)>> {
        run_blocking(move || {
            Ok(open_source::<T>(&path, chunk_size)?
                .map(|(reader, mapper)| (mapper, reader.collect::<Vec<_>>())))
        })
        .await
    }
}

type WorkerResult = std::result::Result<ChunkOutcome, (WorkerFailureKind, String)>;

fn run_worker<C, T>(
    connector: &C,
    mapper: &SchemaMapper<T>,
    chunk: &Chunk,
    strategy: WorkerStrategy,
) -> WorkerResult
where
    C: StoreConnector,
    T: Importable,
{
    let store = connector
        .connect()
        .map_err(|e| (WorkerFailureKind::Connect, e.to_string()))?;
    import_chunk(&store, mapper, chunk, strategy)
        .map_err(|e| (WorkerFailureKind::Store, e.to_string()))
}

/// Run coordinator work on the blocking pool
pub(crate) async fn run_blocking<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(ImportError::Task(join_error_message(e))),
    }
}

fn join_error_message(e: JoinError) -> String {
    if e.is_panic() {
        panic_message(e.into_panic())
    } else {
        e.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

//! Boolean import facade for interactive callers
//!
//! Wraps the loaders so a caller never sees an error: failures are logged
//! and turned into `false`.

use crate::chunked::load_in_chunks;
use crate::config::IngestConfig;
use crate::error::Result;
use crate::mapper::Importable;
use crate::parallel::{run_blocking, ParallelLoader};
use crate::report::ImportReport;
use crate::sequential::load_sequential;
use socnet_store::StoreConnector;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, warn};

/// Loader entry points bound to one store and one configuration
pub struct Importer<C> {
    connector: Arc<C>,
    config: IngestConfig,
}

impl<C: StoreConnector> Importer<C> {
    pub fn new(connector: C, config: IngestConfig) -> Self {
        Self {
            connector: Arc::new(connector),
            config,
        }
    }

    /// Row-by-row import, returning the full report
    pub fn sequential<T: Importable>(&self, path: &Path) -> Result<ImportReport> {
        let store = self.connector.connect()?;
        load_sequential::<T, _>(&store, path)
    }

    /// Chunked import; `None` uses the configured slice size
    pub fn chunked<T: Importable>(
        &self,
        path: &Path,
        chunk_size: Option<usize>,
    ) -> Result<ImportReport> {
        let chunk_size = chunk_size.unwrap_or_else(|| self.config.chunk_size(T::COLLECTION));
        let store = self.connector.connect()?;
        load_in_chunks::<T, _>(&store, path, chunk_size)
    }

    /// [`Importer::sequential`] on the blocking pool, for async callers
    pub async fn sequential_blocking<T: Importable>(&self, path: &Path) -> Result<ImportReport> {
        let connector = Arc::clone(&self.connector);
        let path = path.to_path_buf();
        run_blocking(move || {
            let store = connector.connect()?;
            load_sequential::<T, _>(&store, &path)
        })
        .await
    }

    /// [`Importer::chunked`] on the blocking pool, for async callers
    pub async fn chunked_blocking<T: Importable>(
        &self,
        path: &Path,
        chunk_size: Option<usize>,
    ) -> Result<ImportReport> {
        let chunk_size = chunk_size.unwrap_or_else(|| self.config.chunk_size(T::COLLECTION));
        let connector = Arc::clone(&self.connector);
        let path = path.to_path_buf();
        run_blocking(move || {
            let store = connector.connect()?;
            load_in_chunks::<T, _>(&store, &path, chunk_size)
        })
        .await
    }

    /// Parallel import; `None` uses the configured slice size
    pub async fn parallel<T: Importable>(
        &self,
        path: &Path,
        chunk_size: Option<usize>,
    ) -> Result<ImportReport> {
        let chunk_size =
            chunk_size.unwrap_or_else(|| self.config.parallel_chunk_size(T::COLLECTION));
        ParallelLoader::from_shared(Arc::clone(&self.connector))
            .with_strategy(self.config.strategy)
            .with_worker_timeout(self.config.worker_timeout())
            .load::<T>(path, chunk_size)
            .await
    }

    /// True when the file was found and every row was accounted for
    pub fn load_sequential<T: Importable>(&self, path: &Path) -> bool {
        settle(self.sequential::<T>(path))
    }

    pub fn load_in_chunks<T: Importable>(&self, path: &Path, chunk_size: usize) -> bool {
        settle(self.chunked::<T>(path, Some(chunk_size)))
    }

    /// False also when any worker failed to finish its slice
    pub async fn load_parallel<T: Importable>(&self, path: &Path, chunk_size: usize) -> bool {
        settle(self.parallel::<T>(path, Some(chunk_size)).await)
    }
}

fn settle(result: Result<ImportReport>) -> bool {
    match result {
        Ok(report) => {
            if report.has_write_errors() {
                warn!(
                    skipped = report.row_failures.len(),
                    failed_workers = report.worker_failures.len(),
                    "Import finished with write errors"
                );
            }
            report.worker_failures.is_empty()
        },
        Err(e) => {
            error!("Import failed: {}", e);
            false
        },
    }
}

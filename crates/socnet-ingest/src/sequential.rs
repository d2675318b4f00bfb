//! Sequential loader: one single-document insert per row

use crate::chunked::open_source;
use crate::config::WorkerStrategy;
use crate::error::Result;
use crate::guard::import_chunk;
use crate::mapper::Importable;
use crate::report::{ImportReport, LoadMode};
use socnet_store::RecordStore;
use std::path::Path;
use tracing::{info, instrument};

/// Rows held in memory at once
const READ_BATCH: usize = 1_000;

/// Load a CSV file row by row
///
/// Duplicates, missing owners and malformed rows are skipped and reported.
#[instrument(skip(store), fields(path = %path.display(), collection = %T::COLLECTION))]
pub fn load_sequential<T, S>(store: &S, path: &Path) -> Result<ImportReport>
where
    T: Importable,
    S: RecordStore + ?Sized,
{
    let mut report = ImportReport::new(T::COLLECTION, LoadMode::Sequential);
    let Some((reader, mapper)) = open_source::<T>(path, READ_BATCH)? else {
        info!("Empty source, nothing to import");
        return Ok(report);
    };

    for chunk in reader {
        report.chunks += 1;
        report.absorb(import_chunk(store, &mapper, &chunk, WorkerStrategy::RowByRow)?);
    }

    info!("{}", report);
    Ok(report)
}

//! Chunked loader: one unordered bulk insert per slice

use crate::config::WorkerStrategy;
use crate::error::Result;
use crate::guard::import_chunk;
use crate::mapper::{Importable, SchemaMapper};
use crate::reader::ChunkReader;
use crate::report::{ImportReport, LoadMode};
use socnet_store::RecordStore;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Open a source file and resolve its header
///
/// Returns `None` for a zero-byte file, which imports as empty.
pub(crate) fn open_source<T: Importable>(
    path: &Path,
    chunk_size: usize,
) -> Result<Option<(ChunkReader<File>, SchemaMapper<T>)>> {
    let reader = ChunkReader::from_path(path, chunk_size)?;
    if reader.is_blank() {
        return Ok(None);
    }
    let mapper = SchemaMapper::<T>::from_headers(reader.headers());
    let missing = mapper.missing_columns();
    if !missing.is_empty() {
        warn!(
            missing = ?missing,
            "Header lacks required columns, every row will be skipped"
        );
    }
    Ok(Some((reader, mapper)))
}

/// Load a CSV file in slices of at most `chunk_size` rows
///
/// Each slice is mapped, owner-checked and written with one unordered
/// bulk insert. Colliding documents are skipped and reported; the next
/// slice is always attempted.
///
/// # Errors
///
/// `FileNotFound` or `InvalidChunkSize` before any write;
/// `Store` if the store itself fails.
#[instrument(skip(store), fields(path = %path.display(), collection = %T::COLLECTION))]
pub fn load_in_chunks<T, S>(store: &S, path: &Path, chunk_size: usize) -> Result<ImportReport>
where
    T: Importable,
    S: RecordStore + ?Sized,
{
    let mut report = ImportReport::new(T::COLLECTION, LoadMode::Chunked);
    let Some((reader, mapper)) = open_source::<T>(path, chunk_size)? else {
        info!("Empty source, nothing to import");
        return Ok(report);
    };

    for chunk in reader {
        debug!(chunk = chunk.index, rows = chunk.len(), "Importing chunk");
        let outcome = import_chunk(store, &mapper, &chunk, WorkerStrategy::Bulk)?;
        if !outcome.failures.is_empty() {
            debug!(
                chunk = chunk.index,
                skipped = outcome.failures.len(),
                "Chunk partially imported"
            );
        }
        report.chunks += 1;
        report.absorb(outcome);
    }

    info!("{}", report);
    Ok(report)
}

//! Per-slice import with uniqueness and owner checks
//!
//! Shared by every loader. The store enforces unique ids; the owner of a
//! status is checked here, before any insert is attempted for that row.

use crate::config::WorkerStrategy;
use crate::mapper::{Importable, SchemaMapper};
use crate::reader::{Chunk, RawRow};
use crate::report::{ChunkOutcome, FailureKind, RowFailure};
use socnet_store::{RecordStore, StoreError, UserAccounts, WriteErrorKind};
use tracing::warn;

/// Whether the record's owning user is missing from the store
pub fn owner_missing<T, S>(store: &S, record: &T) -> Result<bool, StoreError>
where
    T: Importable,
    S: RecordStore + ?Sized,
{
    match record.owner() {
        Some(user_id) => Ok(!UserAccounts::new(store).exists(user_id)?),
        None => Ok(false),
    }
}

/// Import one slice with the given strategy
///
/// Rows that cannot be imported are returned as failures. Only a store
/// error unrelated to a single document ends the slice early.
pub fn import_chunk<T, S>(
    store: &S,
    mapper: &SchemaMapper<T>,
    chunk: &Chunk,
    strategy: WorkerStrategy,
) -> Result<ChunkOutcome, StoreError>
where
    T: Importable,
    S: RecordStore + ?Sized,
{
    let mut outcome = ChunkOutcome {
        rows_read: chunk.len() as u64,
        ..ChunkOutcome::default()
    };

    let mut admitted = Vec::with_capacity(chunk.len());
    for row in &chunk.rows {
        match admit(store, mapper, row)? {
            Ok(record) => admitted.push((row.line(), record)),
            Err(failure) => skip::<T>(&mut outcome, failure),
        }
    }

    match strategy {
        WorkerStrategy::RowByRow => insert_rows(store, admitted, &mut outcome)?,
        WorkerStrategy::Bulk => insert_batch(store, admitted, &mut outcome)?,
    }

    Ok(outcome)
}

/// Map a row and run the owner check
fn admit<T, S>(
    store: &S,
    mapper: &SchemaMapper<T>,
    row: &RawRow,
) -> Result<Result<T, RowFailure>, StoreError>
where
    T: Importable,
    S: RecordStore + ?Sized,
{
    let (line, record) = match row {
        RawRow::Record { line, record } => (*line, record),
        RawRow::Unreadable { line, reason } => {
            return Ok(Err(RowFailure {
                line: *line,
                key: None,
                kind: FailureKind::MalformedRow,
                reason: reason.clone(),
            }))
        },
    };

    let mapped = match mapper.map(record) {
        Ok(mapped) => mapped,
        Err(malformed) => {
            return Ok(Err(RowFailure {
                line,
                key: malformed.key.clone(),
                reason: malformed.to_string(),
                kind: FailureKind::MalformedRow,
            }))
        },
    };

    if owner_missing(store, &mapped)? {
        return Ok(Err(RowFailure {
            line,
            key: Some(mapped.key().to_string()),
            kind: FailureKind::OwnerNotFound,
            reason: format!("user {} does not exist", mapped.owner().unwrap_or_default()),
        }));
    }

    Ok(Ok(mapped))
}

fn insert_rows<T, S>(
    store: &S,
    admitted: Vec<(u64, T)>,
    outcome: &mut ChunkOutcome,
) -> Result<(), StoreError>
where
    T: Importable,
    S: RecordStore + ?Sized,
{
    for (line, record) in admitted {
        match store.insert_one(T::COLLECTION, &record.to_document()?) {
            Ok(()) => outcome.inserted += 1,
            Err(e) if e.is_duplicate_key() => skip::<T>(
                outcome,
                RowFailure {
                    line,
                    key: Some(record.key().to_string()),
                    kind: FailureKind::DuplicateKey,
                    reason: e.to_string(),
                },
            ),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn insert_batch<T, S>(
    store: &S,
    admitted: Vec<(u64, T)>,
    outcome: &mut ChunkOutcome,
) -> Result<(), StoreError>
where
    T: Importable,
    S: RecordStore + ?Sized,
{
    if admitted.is_empty() {
        return Ok(());
    }

    let docs = admitted
        .iter()
        .map(|(_, record)| record.to_document())
        .collect::<socnet_common::Result<Vec<_>>>()?;

    let result = store.insert_many(T::COLLECTION, &docs)?;
    outcome.inserted += result.inserted_count as u64;

    for error in result.write_errors {
        let line = admitted.get(error.index).map_or(0, |(line, _)| *line);
        let kind = match error.kind {
            WriteErrorKind::DuplicateKey => FailureKind::DuplicateKey,
            WriteErrorKind::MissingId => FailureKind::MalformedRow,
        };
        skip::<T>(
            outcome,
            RowFailure {
                line,
                key: (!error.key.is_empty()).then_some(error.key),
                kind,
                reason: error.reason,
            },
        );
    }
    Ok(())
}

fn skip<T: Importable>(outcome: &mut ChunkOutcome, failure: RowFailure) {
    match &failure.key {
        Some(key) => warn!(
            line = failure.line,
            kind = ?failure.kind,
            "{}: {} failed to add: {}",
            T::COLLECTION.key_name(),
            key,
            failure.reason
        ),
        None => warn!(
            line = failure.line,
            kind = ?failure.kind,
            "Row failed to add: {}",
            failure.reason
        ),
    }
    outcome.failures.push(failure);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::reader::ChunkReader;
    use socnet_common::{StatusUpdate, UserAccount};
    use socnet_store::{SqliteStore, StatusUpdates};

    const STATUSES: &str = "STATUS_ID,USER_ID,STATUS_TEXT\n\
        dave03_00001,dave03,Sunny in Seattle\n\
        ghost_00001,ghost,Boo\n\
        dave03_00002,,missing owner\n\
        dave03_00001,dave03,Sunny again\n\
        dave03_00003,dave03,Rainy\n";

    fn store_with_dave() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        UserAccounts::new(&store)
            .add_user(&UserAccount::new("dave03", "david.yuen@gmail.com", "David", "Yuen"))
            .unwrap();
        store
    }

    fn first_chunk(source: &str) -> (SchemaMapper<StatusUpdate>, Chunk) {
        let mut reader = ChunkReader::from_reader(source.as_bytes(), 100).unwrap();
        let mapper = SchemaMapper::from_headers(reader.headers());
        (mapper, reader.next().unwrap())
    }

    fn kinds(outcome: &ChunkOutcome) -> Vec<(u64, FailureKind)> {
        outcome.failures.iter().map(|f| (f.line, f.kind)).collect()
    }

    #[test]
    fn test_row_by_row_reports_each_skip() {
        let store = store_with_dave();
        let (mapper, chunk) = first_chunk(STATUSES);

        let outcome = import_chunk(&store, &mapper, &chunk, WorkerStrategy::RowByRow).unwrap();

        assert_eq!(outcome.rows_read, 5);
        assert_eq!(outcome.inserted, 2);
        assert_eq!(
            kinds(&outcome),
            vec![
                (3, FailureKind::OwnerNotFound),
                (4, FailureKind::MalformedRow),
                (5, FailureKind::DuplicateKey),
            ]
        );
        assert_eq!(StatusUpdates::new(&store).len().unwrap(), 2);
    }

    #[test]
    fn test_bulk_matches_row_by_row() {
        let store = store_with_dave();
        let (mapper, chunk) = first_chunk(STATUSES);

        let outcome = import_chunk(&store, &mapper, &chunk, WorkerStrategy::Bulk).unwrap();

        assert_eq!(outcome.inserted, 2);
        let mut failures = kinds(&outcome);
        failures.sort();
        assert_eq!(
            failures,
            vec![
                (3, FailureKind::OwnerNotFound),
                (4, FailureKind::MalformedRow),
                (5, FailureKind::DuplicateKey),
            ]
        );
        assert!(StatusUpdates::new(&store).search_status("ghost_00001").unwrap().is_none());
    }

    #[test]
    fn test_owner_missing() {
        let store = store_with_dave();

        assert!(!owner_missing(&store, &StatusUpdate::new("a", "dave03", "t")).unwrap());
        assert!(owner_missing(&store, &StatusUpdate::new("b", "ghost", "t")).unwrap());
        assert!(!owner_missing(&store, &UserAccount::new("ghost", "g@x", "G", "H")).unwrap());
    }
}

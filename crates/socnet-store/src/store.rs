//! The record store contract

use crate::error::Result;
use crate::filter::Filter;
use socnet_common::{Collection, Document};

/// Why a single document of a bulk insert was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteErrorKind {
    /// The `_id` already exists (in the store or earlier in the batch)
    DuplicateKey,
    /// The document carries no usable `_id`
    MissingId,
}

/// A per-document failure reported by [`RecordStore::insert_many`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
    /// Position of the document in the submitted batch
    pub index: usize,
    /// `_id` of the document, empty when it had none
    pub key: String,
    pub kind: WriteErrorKind,
    pub reason: String,
}

/// Outcome of an unordered bulk insert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkWriteResult {
    pub inserted_count: usize,
    pub write_errors: Vec<WriteError>,
}

/// Document store with per-collection unique `_id`
///
/// Every method is atomic for the documents it touches. A store handle is a
/// single connection and is not meant to be shared between threads; open
/// one per unit of work through a [`StoreConnector`].
pub trait RecordStore {
    /// Fetch a document by primary key
    fn find_by_id(&self, collection: Collection, key: &str) -> Result<Option<Document>>;

    /// Insert one document, failing with `DuplicateKey` if its `_id` exists
    fn insert_one(&self, collection: Collection, doc: &Document) -> Result<()>;

    /// Insert every document that does not collide on `_id`
    ///
    /// Unordered: a failing document never prevents the others from being
    /// written. Failures are reported per document, not as an `Err`.
    fn insert_many(&self, collection: Collection, docs: &[Document]) -> Result<BulkWriteResult>;

    /// Set the given fields on the document with `key`; `_id` is immutable
    ///
    /// Returns the number of matched documents (0 or 1).
    fn update_one(&self, collection: Collection, key: &str, set: &Document) -> Result<u64>;

    /// Delete by primary key, returning the number of removed documents
    fn delete_one(&self, collection: Collection, key: &str) -> Result<u64>;

    /// Delete every document matching the filter
    fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64>;

    /// Count documents matching the filter
    fn count(&self, collection: Collection, filter: &Filter) -> Result<u64>;

    /// Remove every collection's contents
    fn drop_database(&self) -> Result<()>;
}

/// Opens private store connections
///
/// Connectors are shared between import workers; the stores they return
/// are not.
pub trait StoreConnector: Send + Sync + 'static {
    type Store: RecordStore;

    fn connect(&self) -> Result<Self::Store>;

    /// Human-readable location of the store, for logs
    fn describe(&self) -> String;
}

//! SQLite-backed document store
//!
//! Each collection is a table of `(_id, body)` rows where `body` is the JSON
//! document. The `_id` primary key enforces uniqueness. Connections use WAL
//! journaling and a busy timeout so independent connections (one per
//! import worker) can write to the same database file.

pub mod schema;

use crate::error::{Result, StoreError};
use crate::filter::Filter;
use crate::store::{
    BulkWriteResult, RecordStore, StoreConnector, WriteError, WriteErrorKind,
};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::Value;
use socnet_common::{Collection, Document, ID_FIELD};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

/// Default time a connection waits on a locked database before failing
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// A single private connection to the document database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        trace!(path = %path.display(), journal_mode = %mode, "Opened store connection");

        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Create a throwaway in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn body_of(&self, collection: Collection, key: &str) -> Result<Option<String>> {
        let sql = format!(r#"SELECT body FROM "{}" WHERE _id = ?1"#, collection.as_str());
        let body = self
            .conn
            .prepare_cached(&sql)?
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(body)
    }
}

impl RecordStore for SqliteStore {
    fn find_by_id(&self, collection: Collection, key: &str) -> Result<Option<Document>> {
        match self.body_of(collection, key)? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn insert_one(&self, collection: Collection, doc: &Document) -> Result<()> {
        let key = document_key(doc).ok_or(StoreError::MissingId { collection })?;
        let body = serde_json::to_string(doc)?;
        let sql = format!(
            r#"INSERT INTO "{}" (_id, body) VALUES (?1, ?2)"#,
            collection.as_str()
        );

        match self.conn.prepare_cached(&sql)?.execute(params![key, body]) {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateKey {
                collection,
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_many(&self, collection: Collection, docs: &[Document]) -> Result<BulkWriteResult> {
        let mut result = BulkWriteResult::default();
        if docs.is_empty() {
            return Ok(result);
        }

        let sql = format!(
            r#"INSERT INTO "{}" (_id, body) VALUES (?1, ?2)"#,
            collection.as_str()
        );
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for (index, doc) in docs.iter().enumerate() {
                let Some(key) = document_key(doc) else {
                    result.write_errors.push(WriteError {
                        index,
                        key: String::new(),
                        kind: WriteErrorKind::MissingId,
                        reason: "document has no string _id".to_string(),
                    });
                    continue;
                };

                let body = serde_json::to_string(doc)?;
                match stmt.execute(params![key, body]) {
                    Ok(_) => result.inserted_count += 1,
                    Err(e) if is_unique_violation(&e) => {
                        result.write_errors.push(WriteError {
                            index,
                            key: key.to_string(),
                            kind: WriteErrorKind::DuplicateKey,
                            reason: format!("duplicate key in {}", collection),
                        });
                    },
                    Err(e) => return Err(e.into()),
                }
            }
        }
        tx.commit()?;

        debug!(
            collection = %collection,
            inserted = result.inserted_count,
            failed = result.write_errors.len(),
            "Bulk insert finished"
        );
        Ok(result)
    }

    fn update_one(&self, collection: Collection, key: &str, set: &Document) -> Result<u64> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let select = format!(r#"SELECT body FROM "{}" WHERE _id = ?1"#, collection.as_str());
        let body: Option<String> = tx
            .prepare_cached(&select)?
            .query_row(params![key], |row| row.get(0))
            .optional()?;

        let Some(body) = body else {
            return Ok(0);
        };

        let mut doc: Document = serde_json::from_str(&body)?;
        for (field, value) in set {
            if field != ID_FIELD {
                doc.insert(field.clone(), value.clone());
            }
        }

        let update = format!(r#"UPDATE "{}" SET body = ?1 WHERE _id = ?2"#, collection.as_str());
        tx.prepare_cached(&update)?
            .execute(params![serde_json::to_string(&doc)?, key])?;
        tx.commit()?;
        Ok(1)
    }

    fn delete_one(&self, collection: Collection, key: &str) -> Result<u64> {
        let sql = format!(r#"DELETE FROM "{}" WHERE _id = ?1"#, collection.as_str());
        let removed = self.conn.prepare_cached(&sql)?.execute(params![key])?;
        Ok(removed as u64)
    }

    fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        let (clause, values) = where_clause(filter)?;
        let sql = format!(r#"DELETE FROM "{}"{}"#, collection.as_str(), clause);
        let removed = self
            .conn
            .prepare_cached(&sql)?
            .execute(params_from_iter(values))?;
        Ok(removed as u64)
    }

    fn count(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        let (clause, values) = where_clause(filter)?;
        let sql = format!(r#"SELECT COUNT(*) FROM "{}"{}"#, collection.as_str(), clause);
        let count: i64 = self
            .conn
            .prepare_cached(&sql)?
            .query_row(params_from_iter(values), |row| row.get(0))?;
        Ok(count as u64)
    }

    fn drop_database(&self) -> Result<()> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        schema::reset_schema(&tx)?;
        tx.commit()?;
        Ok(())
    }
}

/// Opens [`SqliteStore`] connections to one database file
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreConnector for SqliteConnector {
    type Store = SqliteStore;

    fn connect(&self) -> Result<SqliteStore> {
        SqliteStore::open(&self.path, self.busy_timeout)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

fn document_key(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Translate a filter into a `WHERE` clause over the JSON body
fn where_clause(filter: &Filter) -> Result<(String, Vec<SqlValue>)> {
    filter.validate()?;
    if filter.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut terms = Vec::with_capacity(filter.conditions().len());
    let mut values = Vec::new();

    for (field, value) in filter.conditions() {
        let column = if field == ID_FIELD {
            "_id".to_string()
        } else {
            format!("json_extract(body, '$.{}')", field)
        };

        match to_sql_value(value) {
            Some(sql_value) => {
                values.push(sql_value);
                terms.push(format!("{} = ?{}", column, values.len()));
            },
            None => terms.push(format!("{} IS NULL", column)),
        }
    }

    Ok((format!(" WHERE {}", terms.join(" AND ")), values))
}

/// Map a JSON scalar onto the value `json_extract` yields; `None` means SQL NULL
fn to_sql_value(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(SqlValue::Integer(i)),
            None => Some(SqlValue::Real(n.as_f64().unwrap_or(f64::NAN))),
        },
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        // Nested values compare as their JSON text
        other => Some(SqlValue::Text(other.to_string())),
    }
}

//! Mapping of CSV rows onto typed records
//!
//! Source files use upper-case column names (`USER_ID`, `LASTNAME`, ...).
//! The mapper resolves them against the header once, then turns every row
//! into the entity's canonical record, with the source id as primary key.

use csv::StringRecord;
use socnet_common::{Record, StatusUpdate, UserAccount};
use std::fmt;
use std::marker::PhantomData;

/// A record that can be imported from CSV
pub trait Importable: Record + Send + 'static {
    /// Required source columns, in the order [`Importable::from_columns`] receives them
    const COLUMNS: &'static [&'static str];

    /// Build the record from the required column values
    fn from_columns(values: Vec<String>) -> Self;

    /// Id of the user that must exist before this record is inserted
    fn owner(&self) -> Option<&str> {
        None
    }
}

impl Importable for UserAccount {
    const COLUMNS: &'static [&'static str] = &["USER_ID", "EMAIL", "NAME", "LASTNAME"];

    fn from_columns(values: Vec<String>) -> Self {
        let mut it = values.into_iter();
        let mut next = || it.next().unwrap_or_default();
        UserAccount::new(next(), next(), next(), next())
    }
}

impl Importable for StatusUpdate {
    const COLUMNS: &'static [&'static str] = &["STATUS_ID", "USER_ID", "STATUS_TEXT"];

    fn from_columns(values: Vec<String>) -> Self {
        let mut it = values.into_iter();
        let mut next = || it.next().unwrap_or_default();
        StatusUpdate::new(next(), next(), next())
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.user_id)
    }
}

/// A row missing a required value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// First required column that was absent or empty
    pub column: &'static str,
    /// Value of the id column, when the row had one
    pub key: Option<String>,
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing value for column {}", self.column)
    }
}

impl std::error::Error for MalformedRow {}

/// Header-resolved row mapper for one entity type
#[derive(Debug)]
pub struct SchemaMapper<T> {
    indices: Vec<Option<usize>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for SchemaMapper<T> {
    fn clone(&self) -> Self {
        Self {
            indices: self.indices.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Importable> SchemaMapper<T> {
    /// Resolve the required columns against a header row
    ///
    /// Extra columns are ignored. A required column absent from the header
    /// leaves every row malformed rather than failing the import.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let indices = T::COLUMNS
            .iter()
            .map(|column| headers.iter().position(|h| h.trim() == *column))
            .collect();

        Self {
            indices,
            _entity: PhantomData,
        }
    }

    /// Required columns the header did not provide
    pub fn missing_columns(&self) -> Vec<&'static str> {
        T::COLUMNS
            .iter()
            .zip(&self.indices)
            .filter(|(_, index)| index.is_none())
            .map(|(column, _)| *column)
            .collect()
    }

    /// Map one data row
    pub fn map(&self, row: &StringRecord) -> std::result::Result<T, MalformedRow> {
        let key = self
            .indices
            .first()
            .and_then(|index| index.and_then(|i| row.get(i)))
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string);

        let mut values = Vec::with_capacity(self.indices.len());
        for (column, index) in T::COLUMNS.iter().zip(&self.indices) {
            match index.and_then(|i| row.get(i)) {
                Some(value) if !value.trim().is_empty() => values.push(value.to_string()),
                _ => {
                    return Err(MalformedRow {
                        column: *column,
                        key,
                    })
                },
            }
        }

        Ok(T::from_columns(values))
    }
}

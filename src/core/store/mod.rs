//! Storage access layer
//!
//! The ledger and wishlist only talk to storage through the [`Store`] trait:
//! `get`, `put`, `delete`, `query` over typed [`Record`]s, plus an atomic
//! section for multi-record writes. Two implementations are provided:
//!
//! - [`SqliteStore`] - the durable store backing `.ficelle/inventory.db`
//! - [`MemoryStore`] - an in-memory fake used by tests
//!
//! Record types describe their own table layout via [`Record`], so both
//! stores stay generic over lots, usage records and wishlist items.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, SCHEMA_VERSION};

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rusqlite::types::Value;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::core::identity::{RecordId, RecordPrefix};

/// A typed record persisted in one table
///
/// The id is `None` until the record has been stored; `put` assigns it.
/// `from_row` receives rows selected as `id` followed by [`Record::COLUMNS`]
/// in declaration order, and `to_values` must produce values in that same
/// order (without the id).
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Table name
    const TABLE: &'static str;

    /// Display prefix for references (`LOT@N`)
    const PREFIX: RecordPrefix;

    /// Non-id column names, in order
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<RecordId>;

    fn set_id(&mut self, id: RecordId);

    /// Column values in [`Record::COLUMNS`] order
    fn to_values(&self) -> Vec<Value>;

    /// Build a record from a row of `id, COLUMNS...`
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

/// Storage access interface used by the ledger and the wishlist
pub trait Store {
    /// Fetch one record by id
    fn get<R: Record>(&self, id: RecordId) -> Result<Option<R>, StoreError>;

    /// Insert a record without an id, or replace the stored record with the same id
    ///
    /// Returns the record as stored, with its id set.
    fn put<R: Record>(&mut self, record: R) -> Result<R, StoreError>;

    /// Delete a record by id; returns whether a record was removed
    fn delete<R: Record>(&mut self, id: RecordId) -> Result<bool, StoreError>;

    /// All records of a type, in insertion order
    fn query<R: Record>(&self) -> Result<Vec<R>, StoreError>;

    /// Run `f` so that either all of its writes are applied or none are
    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError>;
}

/// Persistence failures
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("database error: {0}")]
    #[diagnostic(code(ficelle::store::sqlite))]
    Sqlite(#[from] rusqlite::Error),

    #[error("{prefix}@{id} does not exist")]
    #[diagnostic(code(ficelle::store::missing))]
    MissingRecord { prefix: RecordPrefix, id: RecordId },

    #[error("could not encode {table} record: {message}")]
    #[diagnostic(code(ficelle::store::codec))]
    Codec { table: &'static str, message: String },

    #[error("write to {table} failed: {message}")]
    #[diagnostic(code(ficelle::store::write))]
    WriteFailed { table: &'static str, message: String },

    #[error("inventory database uses schema v{found}, this build supports up to v{supported}")]
    #[diagnostic(
        code(ficelle::store::schema),
        help("upgrade ficelle to open this inventory")
    )]
    SchemaTooNew { found: i64, supported: i64 },

    #[error("IO error: {0}")]
    #[diagnostic(code(ficelle::store::io))]
    Io(#[from] std::io::Error),
}

/// Timestamps are stored as RFC 3339 text
pub(crate) fn datetime_to_sql(dt: &DateTime<Utc>) -> Value {
    Value::Text(dt.to_rfc3339())
}

/// Read an RFC 3339 text column
pub(crate) fn datetime_from_row(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse an enum stored as text through its `FromStr`
pub(crate) fn parse_text_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|msg| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            msg.into(),
        )
    })
}

/// Optional strings map to NULL
pub(crate) fn optional_text(value: &Option<String>) -> Value {
    value.clone().map(Value::Text).unwrap_or(Value::Null)
}

//! SQLite-backed store

use std::path::Path;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::{Record, Store, StoreError};
use crate::core::identity::RecordId;

/// Current schema version - stored in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// The inventory store backed by SQLite
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the inventory database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened inventory database");
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create tables if missing and record the schema version
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Stock lots (one row per intake)
            CREATE TABLE IF NOT EXISTS stock_lots (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL,
                material TEXT NOT NULL,
                color_hex TEXT NOT NULL,
                initial_length REAL NOT NULL,
                remaining_length REAL NOT NULL,
                lot_count INTEGER NOT NULL,
                price REAL NOT NULL,
                source TEXT NOT NULL,
                photo BLOB,
                created_at TEXT NOT NULL
            );

            -- Consumption ledger; stock_lot_id is checked by the ledger, not here
            CREATE TABLE IF NOT EXISTS usage_history (
                id INTEGER PRIMARY KEY,
                stock_lot_id INTEGER NOT NULL,
                quantity_used REAL NOT NULL,
                used_at TEXT NOT NULL,
                project TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_usage_lot ON usage_history(stock_lot_id);

            -- Purchase wishlist
            CREATE TABLE IF NOT EXISTS wishlist (
                id INTEGER PRIMARY KEY,
                product TEXT NOT NULL,
                color TEXT,
                priority TEXT NOT NULL,
                link TEXT,
                status TEXT NOT NULL
            );
            "#,
        )?;

        let found: Option<i64> = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .optional()?
            .flatten();

        match found {
            Some(version) if version > SCHEMA_VERSION => Err(StoreError::SchemaTooNew {
                found: version,
                supported: SCHEMA_VERSION,
            }),
            Some(_) => Ok(()),
            None => {
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![SCHEMA_VERSION],
                )?;
                Ok(())
            }
        }
    }

    fn select_sql<R: Record>() -> String {
        format!("SELECT id, {} FROM {}", R::COLUMNS.join(", "), R::TABLE)
    }
}

impl Store for SqliteStore {
    fn get<R: Record>(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        let sql = format!("{} WHERE id = ?1", Self::select_sql::<R>());
        let record = self
            .conn
            .query_row(&sql, params![id], |row| R::from_row(row))
            .optional()?;
        Ok(record)
    }

    fn put<R: Record>(&mut self, mut record: R) -> Result<R, StoreError> {
        let values = record.to_values();

        match record.id() {
            None => {
                let placeholders: Vec<String> =
                    (1..=R::COLUMNS.len()).map(|i| format!("?{}", i)).collect();
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    R::TABLE,
                    R::COLUMNS.join(", "),
                    placeholders.join(", ")
                );
                self.conn.execute(&sql, params_from_iter(values))?;
                record.set_id(self.conn.last_insert_rowid());
            }
            Some(id) => {
                let assignments: Vec<String> = R::COLUMNS
                    .iter()
                    .enumerate()
                    .map(|(i, col)| format!("{} = ?{}", col, i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE {} SET {} WHERE id = ?{}",
                    R::TABLE,
                    assignments.join(", "),
                    R::COLUMNS.len() + 1
                );
                let mut values = values;
                values.push(rusqlite::types::Value::Integer(id));
                let changed = self.conn.execute(&sql, params_from_iter(values))?;
                if changed == 0 {
                    return Err(StoreError::MissingRecord {
                        prefix: R::PREFIX,
                        id,
                    });
                }
            }
        }

        Ok(record)
    }

    fn delete<R: Record>(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let changed = self.conn.execute(&sql, params![id])?;
        Ok(changed > 0)
    }

    fn query<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!("{} ORDER BY id", Self::select_sql::<R>());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| R::from_row(row))?;
        let records = rows.collect::<rusqlite::Result<Vec<R>>>()?;
        Ok(records)
    }

    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(StoreError::from)?;

        let outcome = f(self);
        let finish = if outcome.is_ok() { "COMMIT" } else { "ROLLBACK" };

        if let Err(e) = self.conn.execute_batch(finish) {
            if outcome.is_ok() {
                let _ = self.conn.execute_batch("ROLLBACK");
                return Err(StoreError::from(e).into());
            }
            tracing::warn!(error = %e, "rollback failed");
        }

        outcome
    }
}

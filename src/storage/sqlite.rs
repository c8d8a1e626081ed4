//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::Item;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    BulkWriteOutcome, Storage, StorageError, StorageResult, WriteFailure, WriteOp,
};
use crate::HarvestError;
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, ErrorCode};
use std::collections::BTreeMap;
use std::path::Path;

/// Largest number of titles bound into one lookup statement
///
/// Bundled SQLite allows 32766 host parameters; a catalog harvest stays far
/// below this, so a run normally needs a single query.
const MAX_LOOKUP_PARAMS: usize = 32_000;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the item database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError::StoreUnavailable)` - The database could not be opened
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let unavailable =
            |e: rusqlite::Error| HarvestError::StoreUnavailable(format!("{}: {}", path.display(), e));

        let conn = Connection::open(path).map_err(unavailable)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(unavailable)?;

        initialize_schema(&conn).map_err(unavailable)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| HarvestError::StoreUnavailable(e.to_string()))?;
        initialize_schema(&conn).map_err(|e| HarvestError::StoreUnavailable(e.to_string()))?;
        Ok(Self { conn })
    }

    fn insert_item(&self, item: &Item) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO items (title, price, rating, first_seen_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![item.title, item.price, item.rating, now],
            )
            .map_err(|e| classify_write_error(e, &item.title))?;
        Ok(())
    }

    fn update_item(&self, item: &Item) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self
            .conn
            .execute(
                "UPDATE items SET price = ?1, rating = ?2, updated_at = ?3 WHERE title = ?4",
                params![item.price, item.rating, now, item.title],
            )
            .map_err(|e| classify_write_error(e, &item.title))?;

        if changed == 0 {
            return Err(StorageError::ItemNotFound(item.title.clone()));
        }
        Ok(())
    }
}

/// Maps unique-index violations to `DuplicateKey`
fn classify_write_error(err: rusqlite::Error, title: &str) -> StorageError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StorageError::DuplicateKey(title.to_string())
        }
        _ => StorageError::Sqlite(err),
    }
}

impl Storage for SqliteStorage {
    fn find_by_titles(&self, titles: &[&str]) -> StorageResult<Vec<Item>> {
        let mut items = Vec::new();

        for chunk in titles.chunks(MAX_LOOKUP_PARAMS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let query = format!(
                "SELECT title, price, rating FROM items WHERE title IN ({})",
                placeholders
            );

            let mut stmt = self.conn.prepare(&query)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok(Item {
                    title: row.get(0)?,
                    price: row.get(1)?,
                    rating: row.get(2)?,
                })
            })?;

            for row in rows {
                items.push(row?);
            }
        }

        Ok(items)
    }

    fn bulk_write(&mut self, ops: &[WriteOp]) -> BulkWriteOutcome {
        let mut outcome = BulkWriteOutcome::default();

        for (index, op) in ops.iter().enumerate() {
            let result = match op {
                WriteOp::Insert(item) => self.insert_item(item),
                WriteOp::Update(item) => self.update_item(item),
            };

            match result {
                Ok(()) => match op {
                    WriteOp::Insert(_) => outcome.inserted += 1,
                    WriteOp::Update(_) => outcome.updated += 1,
                },
                Err(error) => {
                    let recoverable = error.is_recoverable();
                    outcome.failures.push(WriteFailure {
                        index,
                        title: op.title().to_string(),
                        error,
                    });
                    if !recoverable {
                        outcome.halted = true;
                        break;
                    }
                }
            }
        }

        outcome
    }

    // ===== Statistics =====

    fn count_items(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn rating_breakdown(&self) -> StorageResult<BTreeMap<u8, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT rating, COUNT(*) FROM items GROUP BY rating ORDER BY rating")?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)?)))?;

        let mut breakdown = BTreeMap::new();
        for row in rows {
            let (rating, count) = row?;
            breakdown.insert(rating, count as u64);
        }

        Ok(breakdown)
    }
}

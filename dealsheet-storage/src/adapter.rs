//! Tabular Record Adapter
//!
//! Presents a header-plus-rows table as a record store: list everything,
//! append one record, update or upsert one record located by a key column.
//!
//! Every operation re-reads the table, so the header used to place values is
//! always the one stored at the time of the call. Nothing is locked between
//! the read and the write: two concurrent updates of the same row both read
//! the same snapshot and the later write wins, silently discarding the
//! earlier one's changes to other columns. The same applies between a failed
//! update and the append that `upsert_by_key` falls back to.

use dealsheet_core::{CellValue, NotFound, Record, StoreError, StoreResult, StoredRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::store::TableStore;

/// Which path `upsert_by_key` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    /// An existing row was patched in place.
    Updated,
    /// No row matched; a new row was appended.
    Inserted,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertOutcome::Updated => "updated",
            UpsertOutcome::Inserted => "inserted",
        }
    }
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record-oriented access over a [`TableStore`].
#[derive(Clone)]
pub struct TableAdapter {
    store: Arc<dyn TableStore>,
}

impl std::fmt::Debug for TableAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableAdapter").finish_non_exhaustive()
    }
}

impl TableAdapter {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    /// All records of `table` in stored order. A table without a header row
    /// has no records.
    pub async fn list(&self, table: &str) -> StoreResult<Vec<StoredRecord>> {
        let rows = self.store.read_rows(table).await?;
        let Some((header, body)) = rows.split_first() else {
            return Ok(Vec::new());
        };
        let records: Vec<StoredRecord> = body
            .iter()
            .map(|row| StoredRecord::from_row(header, row))
            .collect();
        tracing::debug!(table, count = records.len(), "Listed records");
        Ok(records)
    }

    /// Append `record` as a new last row, placed by the header read in this
    /// call. Columns the header does not know are dropped.
    pub async fn append(&self, table: &str, record: &Record) -> StoreResult<()> {
        let rows = self.store.read_rows(table).await?;
        let header = match rows.first() {
            Some(header) if !header.is_empty() => header,
            _ => {
                return Err(NotFound::Header {
                    table: table.to_string(),
                }
                .into())
            }
        };

        let dropped: Vec<&str> = record
            .columns()
            .filter(|col| !header.iter().any(|h| h == col))
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(table, ?dropped, "Dropping columns missing from header");
        }

        let row = header
            .iter()
            .map(|column| record.text(column).unwrap_or_default())
            .collect();
        self.store.append_row(table, row).await?;
        tracing::info!(table, "Appended record");
        Ok(())
    }

    /// Patch the first row whose `key_column` equals `key_value`.
    ///
    /// Columns the patch leaves unspecified keep their stored text. Fails with
    /// [`NotFound::Column`] when the header lacks `key_column` and with
    /// [`NotFound::Row`] when no row matches; neither case writes anything.
    pub async fn update_by_key(
        &self,
        table: &str,
        key_column: &str,
        key_value: impl Into<CellValue>,
        patch: &Record,
    ) -> StoreResult<()> {
        let key: CellValue = key_value.into();
        let key = key.to_cell_text().unwrap_or_default();
        let rows = self.store.read_rows(table).await?;
        let header: &[String] = rows.first().map(Vec::as_slice).unwrap_or_default();

        let key_idx = header
            .iter()
            .position(|h| h == key_column)
            .ok_or_else(|| NotFound::Column {
                table: table.to_string(),
                column: key_column.to_string(),
            })?;

        let found = rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.get(key_idx).map_or("", String::as_str) == key);
        let Some((row_idx, existing)) = found else {
            return Err(NotFound::Row {
                table: table.to_string(),
                column: key_column.to_string(),
                value: key,
            }
            .into());
        };

        let replacement = header
            .iter()
            .enumerate()
            .map(|(i, column)| {
                patch
                    .text(column)
                    .or_else(|| existing.get(i).cloned())
                    .unwrap_or_default()
            })
            .collect();

        // rows[0] is sheet row 1, so rows[i] is sheet row i + 1.
        let row_number = row_idx + 1;
        self.store.update_row(table, row_number, replacement).await?;
        tracing::info!(table, key_column, key = %key, row_number, "Updated record");
        Ok(())
    }

    /// Update the row keyed by `key_value`, or append `record` (with the key
    /// column set) when the key column or the row is missing.
    ///
    /// Any other failure is returned as-is and nothing is appended, so a
    /// transport error during the update can never produce a duplicate row.
    pub async fn upsert_by_key(
        &self,
        table: &str,
        key_column: &str,
        key_value: impl Into<CellValue>,
        record: &Record,
    ) -> StoreResult<UpsertOutcome> {
        let key_value: CellValue = key_value.into();
        match self
            .update_by_key(table, key_column, key_value.clone(), record)
            .await
        {
            Ok(()) => Ok(UpsertOutcome::Updated),
            Err(err) if err.is_not_found() => {
                tracing::debug!(table, key_column, error = %err, "Upsert falling back to append");
                let mut inserted = record.clone();
                inserted.insert(key_column, key_value);
                self.append(table, &inserted).await?;
                Ok(UpsertOutcome::Inserted)
            }
            Err(err) => {
                tracing::warn!(table, key_column, error = %err, "Upsert failed");
                Err(err)
            }
        }
    }
}

/// Treat any not-found error as `None`, keeping every other failure.
pub fn optional<T>(result: StoreResult<T>) -> StoreResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

// ============================================================================
// TESTS
// ============================================================================

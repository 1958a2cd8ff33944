//! In-memory table store for tests and local development.

use async_trait::async_trait;
use dealsheet_core::{StoreError, StoreResult, TableNames};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use crate::store::{StoreOp, TableStore};

/// Grid-per-table store mimicking how a spreadsheet answers range calls.
///
/// Reads drop trailing empty cells and trailing empty rows, as the Sheets
/// API does. Each primitive is atomic on its own; nothing spans primitives.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    tables: RwLock<HashMap<String, Vec<Vec<String>>>>,
    faults: Mutex<HashMap<StoreOp, VecDeque<StoreError>>>,
    writes: AtomicUsize,
}

impl InMemoryTableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding just the header row of every configured table.
    pub fn seeded(tables: &TableNames) -> Self {
        tables
            .layouts()
            .into_iter()
            .fold(Self::new(), |store, (name, header)| {
                store.with_rows(name, [header.to_vec()])
            })
    }

    /// Replace `table` with `rows` (header first).
    pub fn with_rows<R, C>(self, table: &str, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let grid = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.to_string(), grid);
        self
    }

    /// Raw grid of `table`, header included.
    pub fn rows(&self, table: &str) -> Vec<Vec<String>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .map(|grid| visible_rows(grid))
            .unwrap_or_default()
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self, table: &str) -> usize {
        self.rows(table).len().saturating_sub(1)
    }

    /// Number of successful appends and updates across all tables.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make the next call to `op` fail with `error`. Faults queue up per
    /// operation and are consumed one per call.
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Clear all tables, pending faults and the write counter.
    pub fn clear(&self) {
        self.tables.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.faults.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.writes.store(0, Ordering::SeqCst);
    }

    fn take_fault(&self, op: StoreOp) -> StoreResult<()> {
        let mut faults = self.faults.lock().map_err(|_| StoreError::LockPoisoned)?;
        match faults.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        self.take_fault(StoreOp::ReadRows)?;
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables.get(table).map(|grid| visible_rows(grid)).unwrap_or_default())
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> StoreResult<()> {
        self.take_fault(StoreOp::AppendRow)?;
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let grid = tables.entry(table.to_string()).or_default();
        while grid.last().is_some_and(|r| is_blank(r)) {
            grid.pop();
        }
        grid.push(row);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_row(&self, table: &str, row_number: usize, row: Vec<String>) -> StoreResult<()> {
        self.take_fault(StoreOp::UpdateRow)?;
        if row_number == 0 {
            return Err(StoreError::transport(
                StoreOp::UpdateRow.as_str(),
                "row numbers start at 1",
            ));
        }
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let grid = tables.entry(table.to_string()).or_default();
        if grid.len() < row_number {
            grid.resize_with(row_number, Vec::new);
        }
        let target = &mut grid[row_number - 1];
        if target.len() < row.len() {
            target.resize(row.len(), String::new());
        }
        for (cell, value) in target.iter_mut().zip(row) {
            *cell = value;
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

/// Rows as the Sheets API would return them.
fn visible_rows(grid: &[Vec<String>]) -> Vec<Vec<String>> {
    let last = grid.iter().rposition(|r| !is_blank(r)).map_or(0, |i| i + 1);
    grid[..last]
        .iter()
        .map(|row| {
            let width = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
            row[..width].to_vec()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deals_store() -> InMemoryTableStore {
        InMemoryTableStore::new().with_rows(
            "Deals",
            [vec!["id", "title", "stage"], vec!["D-1", "Alpha", ""]],
        )
    }

    #[tokio::test]
    async fn test_read_trims_trailing_empty_cells() {
        let store = deals_store();
        let rows = store.read_rows("Deals").await.unwrap();
        assert_eq!(rows[1], vec!["D-1".to_string(), "Alpha".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_table_reads_empty() {
        let store = InMemoryTableStore::new();
        assert!(store.read_rows("Nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_cells_past_written_span() {
        let store = InMemoryTableStore::new().with_rows("T", [vec!["a", "b", "c"]]);
        store
            .update_row("T", 1, vec!["x".to_string()])
            .await
            .unwrap();
        assert_eq!(store.rows("T")[0], vec!["x", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_past_end_pads_rows() {
        let store = InMemoryTableStore::new().with_rows("T", [vec!["h"]]);
        store
            .update_row("T", 3, vec!["v".to_string()])
            .await
            .unwrap();
        assert_eq!(store.rows("T"), vec![vec!["h"], vec![], vec!["v"]]);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let store = deals_store();
        store.fail_next(StoreOp::ReadRows, StoreError::transport("read_rows", "boom"));

        assert!(store.read_rows("Deals").await.is_err());
        assert!(store.read_rows("Deals").await.is_ok());
    }

    #[tokio::test]
    async fn test_write_count_tracks_successful_writes() {
        let store = deals_store();
        store.append_row("Deals", vec!["D-2".to_string()]).await.unwrap();
        store.fail_next(StoreOp::AppendRow, StoreError::transport("append_row", "quota"));
        assert!(store.append_row("Deals", vec!["D-3".to_string()]).await.is_err());
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.row_count("Deals"), 2);
    }

    #[test]
    fn test_seeded_has_headers_only() {
        let store = InMemoryTableStore::seeded(&TableNames::default());
        assert_eq!(store.row_count("Deals"), 0);
        assert_eq!(store.rows("QuoteItems")[0][0], "quote_id");
    }
}

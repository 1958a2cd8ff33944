//! The remote table service as seen by the adapter.

use async_trait::async_trait;
use dealsheet_core::StoreResult;
use std::fmt;
use std::sync::Arc;

/// Primitive operations of a tabular store.
///
/// A table is a named grid of text cells whose first row is the header.
/// Implementations hold no record-level knowledge; column mapping is the
/// adapter's job.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read every non-empty row of `table`, header included.
    /// An unknown or empty table reads as no rows.
    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>>;

    /// Add one row after the last non-empty row of `table`.
    async fn append_row(&self, table: &str, row: Vec<String>) -> StoreResult<()>;

    /// Overwrite the cells of 1-based sheet row `row_number`, starting at the
    /// first column. Cells past the end of `row` are left alone.
    async fn update_row(&self, table: &str, row_number: usize, row: Vec<String>) -> StoreResult<()>;
}

#[async_trait]
impl<T: TableStore + ?Sized> TableStore for Arc<T> {
    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Vec<String>>> {
        (**self).read_rows(table).await
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> StoreResult<()> {
        (**self).append_row(table, row).await
    }

    async fn update_row(&self, table: &str, row_number: usize, row: Vec<String>) -> StoreResult<()> {
        (**self).update_row(table, row_number, row).await
    }
}

/// Names of the store primitives, used for fault injection and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ReadRows,
    AppendRow,
    UpdateRow,
}

impl StoreOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOp::ReadRows => "read_rows",
            StoreOp::AppendRow => "append_row",
            StoreOp::UpdateRow => "update_row",
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

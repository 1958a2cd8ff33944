//! Dealsheet Storage - Record Adapter and Table Stores
//!
//! [`TableAdapter`] turns a header-plus-rows table into list / append /
//! update / upsert on records. The table itself lives behind [`TableStore`]:
//! [`SheetsTableStore`] talks to Google Sheets, [`InMemoryTableStore`] keeps
//! grids in memory for tests and local runs.

pub mod adapter;
pub mod memory;
pub mod sheets;
pub mod store;

pub use adapter::{optional, TableAdapter, UpsertOutcome};
pub use memory::InMemoryTableStore;
pub use sheets::{SheetsConfig, SheetsTableStore};
pub use store::{StoreOp, TableStore};

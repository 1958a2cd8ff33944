//! Dealsheet Core - Data Types and Sales Domain
//!
//! Record types exchanged with the spreadsheet store, the error types every
//! other crate reports with, and the small amount of sales logic (stages,
//! quotation math, row builders). No I/O lives here.

pub mod account;
pub mod deal;
pub mod error;
pub mod id;
pub mod quote;
pub mod record;
pub mod tables;
pub mod value;

pub use account::{Contact, NewAccount};
pub use deal::{deal_matches, validate_stage_patch, DealStage, NewDeal, PipelineSummary, StageCount};
pub use error::{
    DealsheetError, DealsheetResult, NotFound, StoreError, StoreResult, ValidationError,
};
pub use id::{generate_id, IdKind};
pub use quote::{
    catalog_item, CatalogItem, NewQuote, QuoteItem, QuoteRows, QuoteTotals, CATALOG,
    DEFAULT_VAT_PCT,
};
pub use record::{Record, StoredRecord};
pub use tables::TableNames;
pub use value::CellValue;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Format a timestamp the way it is stored in the sheet
/// (`2024-05-01T08:30:00.000Z`).
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

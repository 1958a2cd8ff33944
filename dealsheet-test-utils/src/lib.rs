//! Dealsheet Test Utilities
//!
//! Shared proptest generators, store fixtures and assertion helpers for
//! testing across the Dealsheet crates.

use dealsheet_core::{
    tables::DEAL_COLUMNS, CellValue, DealStage, QuoteItem, Record, StoredRecord, TableNames,
};
use dealsheet_storage::InMemoryTableStore;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Generate a plain column name.
pub fn arb_column_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,11}"
}

/// Generate a header: `id` first, then up to `max_extra` distinct columns.
pub fn arb_header(max_extra: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(arb_column_name(), 0..=max_extra).prop_map(|cols| {
        let mut header = vec!["id".to_string()];
        header.extend(cols.into_iter().filter(|c| c != "id"));
        header
    })
}

/// Generate the text of a non-empty cell.
pub fn arb_cell_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,@-]{1,16}"
}

/// Generate a scalar cell value of any kind except null.
pub fn arb_cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        arb_cell_text().prop_map(CellValue::Text),
        (0i64..1_000_000).prop_map(CellValue::from),
        any::<bool>().prop_map(CellValue::Bool),
    ]
}

/// Generate a record over a subset of `header`.
pub fn arb_record_for(header: Vec<String>) -> impl Strategy<Value = Record> {
    let width = header.len();
    prop::collection::vec(prop::option::of(arb_cell_value()), width).prop_map(move |values| {
        header
            .iter()
            .zip(values)
            .filter_map(|(column, value)| value.map(|v| (column.clone(), v)))
            .collect()
    })
}

/// Generate a deal stage.
pub fn arb_stage() -> impl Strategy<Value = DealStage> {
    prop::sample::select(DealStage::ALL.to_vec())
}

/// Generate a quote line with sane price and quantity.
pub fn arb_quote_item() -> impl Strategy<Value = QuoteItem> {
    ("[A-Z]{3}-[A-Z]{3,5}", 0u32..50_000, 1u32..20).prop_map(|(sku, price, qty)| QuoteItem {
        name: format!("Item {}", sku),
        sku,
        price: f64::from(price),
        qty: f64::from(qty),
    })
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Store holding only the header row of every default table.
pub fn seeded_store() -> Arc<InMemoryTableStore> {
    Arc::new(InMemoryTableStore::seeded(&TableNames::default()))
}

/// The two-deal board used in most route tests.
pub fn sample_deals() -> Vec<(&'static str, &'static str, DealStage)> {
    vec![
        ("D-1001", "POS upgrade for Cafe A", DealStage::Lead),
        ("D-1002", "Loyalty app for Bakery B", DealStage::Won),
    ]
}

/// Full deal row in `DEAL_COLUMNS` order.
pub fn deal_row(id: &str, title: &str, stage: DealStage) -> Vec<String> {
    DEAL_COLUMNS
        .iter()
        .map(|column| match *column {
            "id" => id.to_string(),
            "title" => title.to_string(),
            "account_name" => "Cafe A Co., Ltd.".to_string(),
            "owner" => "Nok".to_string(),
            "value" => "45000".to_string(),
            "source" => "Referral".to_string(),
            "stage" => stage.as_str().to_string(),
            "created_at" | "updated_at" => "2024-05-01T08:30:00.000Z".to_string(),
            _ => String::new(),
        })
        .collect()
}

/// Seeded store whose deals table holds [`sample_deals`].
pub fn store_with_sample_deals() -> Arc<InMemoryTableStore> {
    let tables = TableNames::default();
    let mut grid: Vec<Vec<String>> = vec![DEAL_COLUMNS.iter().map(|c| c.to_string()).collect()];
    grid.extend(
        sample_deals()
            .into_iter()
            .map(|(id, title, stage)| deal_row(id, title, stage)),
    );
    Arc::new(InMemoryTableStore::seeded(&tables).with_rows(&tables.deals, grid))
}

/// The three-column Deals table from the adapter walkthrough.
pub fn small_deals_store() -> Arc<InMemoryTableStore> {
    Arc::new(InMemoryTableStore::new().with_rows(
        "Deals",
        [vec!["id", "title", "stage"], vec!["D-1", "Alpha", "lead"]],
    ))
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Assert that `record` holds `expected` in `column`.
pub fn assert_cell(record: &StoredRecord, column: &str, expected: &str) {
    assert_eq!(
        record.get(column),
        Some(expected),
        "column '{}' of {:?}",
        column,
        record
    );
}

/// Find the stored row of `table` whose `id` cell equals `id`.
pub fn find_row(store: &InMemoryTableStore, table: &str, id: &str) -> Option<StoredRecord> {
    let rows = store.rows(table);
    let (header, body) = rows.split_first()?;
    body.iter()
        .map(|row| StoredRecord::from_row(header, row))
        .find(|record| record.get("id") == Some(id))
}

/// Parse a JSON response body.
pub fn json_body(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("response body is JSON")
}

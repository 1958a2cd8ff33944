//! Shared handler state.

use dealsheet_core::TableNames;
use dealsheet_storage::{InMemoryTableStore, SheetsTableStore, TableAdapter, TableStore};
use std::sync::Arc;
use std::time::Instant;

use crate::config::{ApiConfig, StoreKind};
use crate::error::ApiResult;

/// State cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub adapter: TableAdapter,
    pub tables: Arc<TableNames>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>, tables: TableNames) -> Self {
        Self {
            adapter: TableAdapter::new(store),
            tables: Arc::new(tables),
            start_time: Instant::now(),
        }
    }

    /// Build the configured store. The Sheets store checks its credentials
    /// here, before the server starts listening.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let store: Arc<dyn TableStore> = match config.store {
            StoreKind::Sheets => {
                let store = SheetsTableStore::from_env()?;
                tracing::info!(spreadsheet_id = store.spreadsheet_id(), "Using Google Sheets store");
                Arc::new(store)
            }
            StoreKind::Memory => {
                tracing::warn!("Using in-memory store; data is not persisted");
                Arc::new(InMemoryTableStore::seeded(&config.tables))
            }
        };
        Ok(Self::new(store, config.tables.clone()))
    }
}

//! Dealsheet API - HTTP Service
//!
//! Axum service exposing the sales pipeline kept in a spreadsheet: deals,
//! accounts, quotes, the stage board and the product catalog. All reads and
//! writes go through [`dealsheet_storage::TableAdapter`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;

pub use config::{ApiConfig, ConfigError, StoreKind};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use state::AppState;

//! REST API Routes
//!
//! - `/api/deals` - list, create, upsert by id
//! - `/api/accounts` - list, create
//! - `/api/quotes` - create with line items
//! - `/api/pipeline`, `/api/catalog` - board summary and products
//! - `/health` - ping, live, ready

pub mod accounts;
pub mod deals;
pub mod health;
pub mod pipeline;
pub mod quotes;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

/// Build the complete router.
///
/// # Middleware Order (outer to inner)
/// 1. CORS - handles preflight requests
/// 2. Trace - one span per request
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let api_routes = Router::new()
        .nest("/deals", deals::create_router())
        .nest("/accounts", accounts::create_router())
        .nest("/quotes", quotes::create_router())
        .merge(pipeline::create_router());

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::create_router())
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
}

async fn not_found() -> ApiError {
    ApiError::from_code(ErrorCode::RouteNotFound)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// In development mode (empty origins), allows all origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

//! Dealsheet API server binary.

use axum::Router;
use dealsheet_api::telemetry::init_tracing;
use dealsheet_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing()?;

    let config = ApiConfig::from_env().map_err(|e| ApiError::internal_error(e.to_string()))?;
    let state = AppState::from_config(&config)?;
    let app: Router = create_api_router(state, &config);

    let addr = config.bind_addr;
    tracing::info!(%addr, store = ?config.store, "Starting Dealsheet API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

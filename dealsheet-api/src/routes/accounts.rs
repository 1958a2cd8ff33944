//! Account REST Routes

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use dealsheet_core::{tables::ID_COLUMN, Record, StoredRecord};

use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;
use crate::types::{ApiResponse, CreateAccountRequest};

/// GET /api/accounts - List accounts
pub async fn list_accounts(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<StoredRecord>>>> {
    let accounts = state.adapter.list(&state.tables.accounts).await?;
    Ok(Json(ApiResponse::ok(accounts)))
}

/// POST /api/accounts - Create an account
pub async fn create_account(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateAccountRequest>,
) -> ApiResult<Json<ApiResponse<Record>>> {
    let record = req.into_new_account().into_record(Utc::now());
    state.adapter.append(&state.tables.accounts, &record).await?;
    tracing::info!(id = %record.text(ID_COLUMN).unwrap_or_default(), "Account created");
    Ok(Json(ApiResponse::ok(record)))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(list_accounts).post(create_account))
}

//! Deal REST Routes

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use dealsheet_core::{
    deal_matches, format_timestamp, tables::ID_COLUMN, validate_stage_patch, Record,
    StoredRecord,
};

use crate::error::{ApiError, ApiResult};
use crate::extractors::ApiJson;
use crate::state::AppState;
use crate::types::{ApiResponse, CreateDealRequest, ListDealsQuery, UpsertDealResponse};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/deals - List deals, optionally filtered by `q`
pub async fn list_deals(
    State(state): State<AppState>,
    Query(params): Query<ListDealsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<StoredRecord>>>> {
    let mut deals = state.adapter.list(&state.tables.deals).await?;
    if let Some(q) = params.q.as_deref() {
        deals.retain(|deal| deal_matches(deal, q));
    }
    Ok(Json(ApiResponse::ok(deals)))
}

/// POST /api/deals - Create a deal
pub async fn create_deal(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDealRequest>,
) -> ApiResult<Json<ApiResponse<Record>>> {
    let record = req.into_new_deal()?.into_record(Utc::now());
    state.adapter.append(&state.tables.deals, &record).await?;
    tracing::info!(id = %record.text(ID_COLUMN).unwrap_or_default(), "Deal created");
    Ok(Json(ApiResponse::ok(record)))
}

/// PATCH /api/deals/:id - Update a deal, creating it if absent
pub async fn upsert_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Record>,
) -> ApiResult<Json<ApiResponse<UpsertDealResponse>>> {
    let id = id.trim().to_string();
    if id.is_empty() {
        return Err(ApiError::missing_field(ID_COLUMN));
    }
    validate_stage_patch(&body)?;

    let mut record = body;
    record.insert(ID_COLUMN, id.clone());
    record.insert("updated_at", format_timestamp(Utc::now()));

    let outcome = state
        .adapter
        .upsert_by_key(&state.tables.deals, ID_COLUMN, id.clone(), &record)
        .await?;
    tracing::info!(id = %id, outcome = outcome.as_str(), "Deal upserted");

    Ok(Json(ApiResponse::ok(UpsertDealResponse { id, outcome })))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_deals).post(create_deal))
        .route("/:id", patch(upsert_deal))
}

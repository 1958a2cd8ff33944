//! Pipeline board and product catalog.

use axum::{extract::State, routing::get, Json, Router};
use dealsheet_core::{CatalogItem, PipelineSummary, CATALOG};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::ApiResponse;

/// GET /api/pipeline - Deal counts per stage and win rate
pub async fn pipeline_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PipelineSummary>>> {
    let deals = state.adapter.list(&state.tables.deals).await?;
    Ok(Json(ApiResponse::ok(PipelineSummary::from_deals(&deals))))
}

/// GET /api/catalog - Products that can be put on a quote
pub async fn catalog() -> Json<ApiResponse<&'static [CatalogItem]>> {
    Json(ApiResponse::ok(CATALOG))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/pipeline", get(pipeline_summary))
        .route("/catalog", get(catalog))
}

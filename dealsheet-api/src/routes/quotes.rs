//! Quote REST Routes
//!
//! A quote is one `Quotes` row plus one `QuoteItems` row per line. The rows
//! are appended one after another with no transaction: if a later append
//! fails, the rows already written stay in the sheet and the error is
//! returned.

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use dealsheet_core::NewQuote;

use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;
use crate::types::{ApiResponse, CreateQuoteRequest, CreateQuoteResponse};

/// POST /api/quotes - Create a quote with its line items
pub async fn create_quote(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateQuoteRequest>,
) -> ApiResult<Json<ApiResponse<CreateQuoteResponse>>> {
    let rows = NewQuote::from(req).into_rows(Utc::now())?;

    state.adapter.append(&state.tables.quotes, &rows.quote).await?;
    for (line, item) in rows.items.iter().enumerate() {
        state
            .adapter
            .append(&state.tables.quote_items, item)
            .await
            .inspect_err(|e| {
                tracing::warn!(quote_id = %rows.id, line = line + 1, error = %e, "Quote item append failed")
            })?;
    }
    tracing::info!(quote_id = %rows.id, lines = rows.items.len(), total = rows.totals.total, "Quote created");

    Ok(Json(ApiResponse::ok(CreateQuoteResponse {
        id: rows.id,
        totals: rows.totals,
        line_count: rows.items.len(),
    })))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/", post(create_quote))
}

//! Portfolio fetch route: `GET /api/data`
//!
//! Returns the stored body exactly as written, minus its storage identity,
//! or `{"data": null}` when nothing has been saved yet. A store failure is a
//! 500; this route never substitutes default content.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use folio_storage::JsonObject;

use super::{method_not_allowed, preflight};
use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/data` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/data",
        get(fetch_document)
            .head(method_not_allowed)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub data: Option<JsonObject>,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Fetch the current portfolio document.
async fn fetch_document(State(state): State<Arc<AppState>>) -> Result<Json<DataResponse>, AppError> {
    let data = state.repository.get_body().await?;
    Ok(Json(DataResponse { data }))
}

//! Portfolio update route: `POST /api/update`
//!
//! Requires `Authorization: Bearer <token>` where the token is the one
//! derived from the currently resolved credential. On success the stored
//! document is fully replaced by the submitted JSON object, stored as sent
//! apart from its forced identity.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{method_not_allowed, preflight};
use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/update` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/update",
        post(update_document)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Replace the portfolio document.
///
/// Checks run in order: bearer header (401), token (403), payload (400).
/// The body is not parsed until the token has been accepted.
async fn update_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UpdateResponse>, AppError> {
    let presented = bearer_token(&headers)?;

    let resolved = state.resolver.resolve().await;
    if !state.codec.verify(resolved.expose(), presented)? {
        warn!(source = ?resolved.source(), "update rejected: token mismatch");
        return Err(AppError::Forbidden("invalid token".to_owned()));
    }

    let request: UpdateRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(data) = request.data.filter(|d| !d.is_null()) else {
        return Err(AppError::BadRequest("no data provided".to_owned()));
    };

    let Value::Object(body) = data else {
        return Err(AppError::BadRequest(
            "data must be a JSON object".to_owned(),
        ));
    };
    state.repository.replace_body(body).await?;

    Ok(Json(UpdateResponse { success: true }))
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(AppError::Unauthorized(
            "missing Authorization header".to_owned(),
        ));
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header must use Bearer scheme".to_owned())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn missing_or_wrong_scheme_is_unauthorized() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic abc")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("bearer abc")),
            Err(AppError::Unauthorized(_))
        ));
    }
}

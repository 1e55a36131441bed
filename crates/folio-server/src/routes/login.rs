//! Admin login route: `POST /api/login`
//!
//! Compares the submitted credential with the currently resolved one and
//! returns the derived bearer token on a match. The raw credential is never
//! echoed back.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use folio_core::token::constant_time_eq;

use super::{method_not_allowed, preflight};
use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api/login` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/login",
        post(login).options(preflight).fallback(method_not_allowed),
    )
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Exchange the admin credential for a bearer token.
///
/// An empty or unparseable body is treated as a missing credential.
async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<LoginResponse>, AppError> {
    let request: LoginRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(password) = request.password.filter(|p| !p.is_empty()) else {
        return Err(AppError::BadRequest("password required".to_owned()));
    };

    let resolved = state.resolver.resolve().await;
    if !constant_time_eq(&password, resolved.expose()) {
        warn!(source = ?resolved.source(), "admin login rejected");
        return Err(AppError::Forbidden("invalid password".to_owned()));
    }

    let token = state.codec.derive(resolved.expose())?;
    info!(source = ?resolved.source(), "admin login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}

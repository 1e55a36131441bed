//! Diagnostic probe route: `GET /api/test-db`
//!
//! Reports configuration presence and store reachability. Always 200. The
//! connection string is shown only as a redacted 30-character prefix; no
//! credential or secret value is ever included. The probe goes through the
//! shared store, so a successful probe also warms the connection.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::{method_not_allowed, preflight};
use crate::state::AppState;

/// Build the `/api/test-db` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/test-db",
        get(probe)
            .head(method_not_allowed)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub backend: &'static str,
    pub store_uri_set: bool,
    pub store_uri_prefix: String,
    pub admin_password_set: bool,
    pub token_secret_set: bool,
    pub connection: String,
    pub database: String,
    pub document: String,
}

const NOT_TESTED: &str = "not tested";

// ── Handlers ─────────────────────────────────────────────────────────

/// Summarize configuration and store reachability.
async fn probe(State(state): State<Arc<AppState>>) -> Json<ProbeReport> {
    let settings = &state.probe;
    let mut report = ProbeReport {
        backend: state.repository.backend_name(),
        store_uri_set: settings.store_uri_set,
        store_uri_prefix: settings
            .store_uri_prefix
            .clone()
            .unwrap_or_else(|| "NOT SET".to_owned()),
        admin_password_set: settings.admin_password_set,
        token_secret_set: settings.token_secret_explicit,
        connection: NOT_TESTED.to_owned(),
        database: NOT_TESTED.to_owned(),
        document: NOT_TESTED.to_owned(),
    };

    if settings.store_uri_required && !settings.store_uri_set {
        report.connection = "SKIPPED - no MONGODB_URI".to_owned();
        return Json(report);
    }

    if let Err(e) = state.repository.ping().await {
        report.connection = format!("FAILED: {e}");
        return Json(report);
    }
    report.connection = "SUCCESS".to_owned();

    match state.repository.stored_field_count().await {
        Ok(count) => {
            report.database = "SUCCESS".to_owned();
            report.document = match count {
                Some(keys) => format!("EXISTS (keys: {keys})"),
                None => "NOT FOUND (empty store - first save will create it)".to_owned(),
            };
        }
        Err(e) => report.database = format!("FAILED: {e}"),
    }

    Json(report)
}

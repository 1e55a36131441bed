//! Wire types for the Folio API.

use serde::Deserialize;
use serde_json::Value;

/// Diagnostic probe report from `GET /api/test-db`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeReport {
    /// Backend name (`mongodb`, `memory`).
    pub backend: String,
    /// Whether a connection string is configured.
    pub store_uri_set: bool,
    /// Redacted, truncated connection-string prefix, or `NOT SET`.
    pub store_uri_prefix: String,
    /// Whether the default admin credential was configured explicitly.
    pub admin_password_set: bool,
    /// Whether the token secret was configured explicitly.
    pub token_secret_set: bool,
    /// Connection result.
    pub connection: String,
    /// Database result.
    pub database: String,
    /// Document status.
    pub document: String,
}

// --- Internal API response types ---

#[derive(Deserialize)]
pub(crate) struct DataResponse {
    pub data: Option<Value>,
}

#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize)]
pub(crate) struct UpdateResponse {
    pub success: bool,
}

#[derive(Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

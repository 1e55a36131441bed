//! HTTP error types for the Folio server.
//!
//! Maps domain errors from `folio-core` into HTTP responses. Every variant
//! produces a JSON body with a machine-readable `error` field and a
//! human-readable `message`. Store failures are logged in full and reported
//! to the caller with a short message only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use folio_core::error::{DocumentError, RepositoryError, TokenError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed caller input.
    BadRequest(String),
    /// Missing or unparseable credentials or token.
    Unauthorized(String),
    /// Well-formed but incorrect credential or token.
    Forbidden(String),
    /// The route does not accept this verb.
    MethodNotAllowed,
    /// Store unreachable, misconfigured, or an unexpected failure.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                "method not allowed".to_owned(),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Document(e) => Self::from(e),
            RepositoryError::Storage(e) => {
                error!(error = %e, "portfolio store operation failed");
                if e.is_unavailable() {
                    Self::Internal("document store unavailable".to_owned())
                } else {
                    Self::Internal("document store error".to_owned())
                }
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        error!(error = %err, "token derivation failed");
        Self::Internal("failed to derive token".to_owned())
    }
}

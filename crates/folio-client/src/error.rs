//! Error types for the Folio client.

use folio_core::error::DocumentError;

/// All errors that can occur when talking to a Folio server or editing the
/// local session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or unusable client configuration.
    #[error("folio config error: {0}")]
    Config(String),

    /// The server rejected the credential or token (401/403).
    #[error("folio auth error {status_code}: {message}")]
    Auth {
        /// HTTP status code.
        status_code: u16,
        /// Error message from the server.
        message: String,
    },

    /// The server returned any other HTTP error.
    #[error("folio API error {status_code}: {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from the server.
        message: String,
    },

    /// The operation needs a logged-in session.
    #[error("not logged in")]
    NotAuthenticated,

    /// Local input was rejected before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// The document could not be built or edited.
    #[error("folio document error: {0}")]
    Document(#[from] DocumentError),

    /// Request timed out.
    #[error("folio request timed out")]
    Timeout,

    /// Network or HTTP client error.
    #[error("folio network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("folio json error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Storage error types.
//!
//! Every error variant carries enough context to diagnose the problem
//! without a debugger. Connection strings never appear in error text.

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store has no usable connection configuration.
    #[error("document store is not configured: {reason}")]
    NotConfigured { reason: String },

    /// Establishing the connection failed.
    #[error("failed to connect to document store: {reason}")]
    Connect { reason: String },

    /// Establishing the connection did not finish within the bounded timeout.
    #[error("connection to document store timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Failed to read a document.
    #[error("failed to read document '{id}': {reason}")]
    Read { id: String, reason: String },

    /// Failed to write a document.
    #[error("failed to write document '{id}': {reason}")]
    Write { id: String, reason: String },

    /// A document could not be converted between JSON and the store's format.
    #[error("invalid document encoding: {reason}")]
    Encoding { reason: String },
}

impl StorageError {
    /// Whether this error means the store could not be reached at all, as
    /// opposed to an operation failing on a live connection.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured { .. } | Self::Connect { .. } | Self::Timeout { .. }
        )
    }
}

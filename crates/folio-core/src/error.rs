//! Error types for `folio-core`.
//!
//! Each error variant carries enough context to diagnose the problem without
//! a debugger. No variant ever includes a credential, token, or secret.

use folio_storage::StorageError;

/// Errors from building, validating, or editing a portfolio document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The body does not match the portfolio document schema.
    #[error("invalid portfolio document: {reason}")]
    Invalid { reason: String },

    /// An edit addressed a section that cannot take it.
    #[error("cannot edit section '{section}': {reason}")]
    Section { section: String, reason: String },

    /// Serializing the document failed.
    #[error("portfolio document encoding failed: {reason}")]
    Encoding { reason: String },
}

/// Errors from the portfolio repository.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The document store returned an error.
    #[error("repository storage error: {0}")]
    Storage(#[from] StorageError),

    /// The body was rejected before writing.
    #[error("repository document error: {0}")]
    Document(#[from] DocumentError),
}

/// Errors from token derivation.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signing secret was rejected by the MAC construction.
    #[error("invalid token secret: {reason}")]
    InvalidSecret { reason: String },
}

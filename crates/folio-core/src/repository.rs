//! Portfolio repository.
//!
//! Binds a [`DocumentStore`] to the single well-known portfolio document.
//! Reads strip the storage identity; writes force it. No retry policy lives
//! here: a store failure is returned to the caller, which decides whether to
//! degrade or propagate.

use std::sync::Arc;

use tracing::info;

use folio_storage::{DocumentStore, ID_FIELD, JsonObject, StorageError};

use crate::document::{check_reserved_fields, stored_override};
use crate::error::RepositoryError;

/// Identity of the one portfolio document.
pub const PORTFOLIO_ID: &str = "portfolio";

/// Gets and replaces the portfolio document.
pub struct PortfolioRepository {
    store: Arc<dyn DocumentStore>,
}

impl PortfolioRepository {
    /// Create a repository over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch the stored body without its storage identity, `None` if it has
    /// never been written. The body is returned as stored; no schema is
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the store is unreachable or the
    /// read fails.
    pub async fn get_body(&self) -> Result<Option<JsonObject>, RepositoryError> {
        let Some(mut body) = self.store.find(PORTFOLIO_ID).await? else {
            return Ok(None);
        };
        body.remove(ID_FIELD);
        Ok(Some(body))
    }

    /// Upsert-replace the stored body with `body`.
    ///
    /// The stored identity is always [`PORTFOLIO_ID`], whatever `body` says.
    /// Only the reserved fields are checked.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::Document`] if a reserved field has the wrong type.
    /// - [`RepositoryError::Storage`] if the store is unreachable or the write fails.
    pub async fn replace_body(&self, body: JsonObject) -> Result<(), RepositoryError> {
        check_reserved_fields(&body)?;
        let fields = body.len();
        self.store.replace(PORTFOLIO_ID, body).await?;
        info!(fields, backend = self.store.backend_name(), "portfolio document replaced");
        Ok(())
    }

    /// The stored credential override, read straight from the stored body.
    /// The rest of the body is not inspected, so no content can hide the
    /// override.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] if the store is unreachable or the read
    /// fails.
    pub async fn credential_override(&self) -> Result<Option<String>, StorageError> {
        let body = self.store.find(PORTFOLIO_ID).await?;
        Ok(body.as_ref().and_then(stored_override).map(str::to_owned))
    }

    /// Number of top-level fields in the stored body (identity included), or
    /// `None` if nothing is stored. Does not validate the body.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the lookup fails.
    pub async fn stored_field_count(&self) -> Result<Option<usize>, RepositoryError> {
        Ok(self.store.find(PORTFOLIO_ID).await?.map(|body| body.len()))
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] with the connection failure.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(self.store.ping().await?)
    }

    /// Name of the backing store.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

impl std::fmt::Debug for PortfolioRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioRepository")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

//! Document store abstraction for Folio.
//!
//! This crate defines the [`DocumentStore`] trait, a keyed JSON-object store
//! that knows nothing about portfolios, credentials, or tokens. The portfolio
//! repository in `folio-core` binds it to the single well-known document.
//!
//! Two implementations are provided:
//!
//! - [`MongoStore`]: production default, backed by MongoDB (feature `mongodb-backend`)
//! - [`MemoryStore`]: in-memory, for development and tests

mod error;
mod memory;
#[cfg(feature = "mongodb-backend")]
mod mongo;

pub use error::StorageError;
pub use memory::MemoryStore;
#[cfg(feature = "mongodb-backend")]
pub use mongo::{MongoSettings, MongoStore};

/// A JSON object body as stored and returned by a [`DocumentStore`].
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Name of the storage-internal identity field carried by stored bodies.
pub const ID_FIELD: &str = "_id";

/// Default upper bound on establishing a store connection.
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// A pluggable document storage backend.
///
/// Documents are JSON objects addressed by a string identity. The identity
/// is stored inside the body under [`ID_FIELD`], the way document databases
/// keep their primary key.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Point lookup by identity.
    ///
    /// Returns `Ok(None)` if no document exists under `id`. A returned body
    /// always contains [`ID_FIELD`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotConfigured`], [`StorageError::Connect`] or
    /// [`StorageError::Timeout`] if the store cannot be reached, and
    /// [`StorageError::Read`] if the lookup itself fails.
    async fn find(&self, id: &str) -> Result<Option<JsonObject>, StorageError>;

    /// Upsert-replace the document under `id`.
    ///
    /// The whole stored body is replaced by `body`; no field-level merge is
    /// performed. Any identity field in `body` is overwritten with `id`.
    ///
    /// # Errors
    ///
    /// Returns a connection error as for [`find`](DocumentStore::find), or
    /// [`StorageError::Write`] if the write fails.
    async fn replace(&self, id: &str, body: JsonObject) -> Result<(), StorageError>;

    /// Verify that the store is reachable, establishing the connection if
    /// it has not been established yet.
    ///
    /// # Errors
    ///
    /// Returns the connection error that prevented the check.
    async fn ping(&self) -> Result<(), StorageError>;

    /// Short backend name for logs and diagnostics.
    fn backend_name(&self) -> &'static str;
}

/// Build the body actually written for `id`: `body` with its identity field
/// forced to `id`.
pub(crate) fn with_identity(id: &str, mut body: JsonObject) -> JsonObject {
    body.remove(ID_FIELD);
    let mut stored = JsonObject::with_capacity(body.len().saturating_add(1));
    stored.insert(ID_FIELD.to_owned(), serde_json::Value::String(id.to_owned()));
    stored.extend(body);
    stored
}

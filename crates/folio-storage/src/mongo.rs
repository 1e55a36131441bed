//! MongoDB document store, the production default.
//!
//! The connection is established lazily on first use and cached for the
//! lifetime of the store. First-use initialization is guarded by a
//! [`tokio::sync::OnceCell`], so concurrent first requests converge on one
//! client instead of racing to create several. A failed attempt leaves the
//! cell empty and the next operation tries again; there is no retry within
//! a single call.
//!
//! Feature-gated behind `mongodb-backend`.

use std::time::Duration;

use bson::{Bson, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{DocumentStore, JsonObject, StorageError, with_identity};

/// Connection settings for [`MongoStore`].
#[derive(Clone)]
pub struct MongoSettings {
    /// Connection string. `None` or empty means the store is misconfigured
    /// and every operation fails with [`StorageError::NotConfigured`].
    pub uri: Option<String>,
    /// Database name.
    pub database: String,
    /// Collection holding the documents.
    pub collection: String,
    /// Upper bound on establishing the connection.
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSettings")
            .field("uri", &self.uri.as_ref().map(|_| "[redacted]"))
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// A document store backed by a MongoDB collection.
///
/// Constructing the store performs no I/O. Share it behind an `Arc`; every
/// clone of that `Arc` reuses the same connection once it is established.
///
/// # Examples
///
/// ```no_run
/// # use folio_storage::{DocumentStore, MongoSettings, MongoStore};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MongoStore::new(MongoSettings {
///     uri: Some("mongodb://localhost:27017".to_owned()),
///     database: "portfolio".to_owned(),
///     collection: "sitedata".to_owned(),
///     connect_timeout: folio_storage::DEFAULT_CONNECT_TIMEOUT,
/// });
/// let doc = store.find("portfolio").await.unwrap();
/// # }
/// ```
pub struct MongoStore {
    settings: MongoSettings,
    database: OnceCell<Database>,
}

impl std::fmt::Debug for MongoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoStore")
            .field("settings", &self.settings)
            .field("connected", &self.database.initialized())
            .finish()
    }
}

impl MongoStore {
    /// Create a store that connects on first use.
    #[must_use]
    pub fn new(settings: MongoSettings) -> Self {
        Self {
            settings,
            database: OnceCell::new(),
        }
    }

    /// Whether the connection has been established in this process.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    async fn database(&self) -> Result<&Database, StorageError> {
        self.database.get_or_try_init(|| self.connect()).await
    }

    async fn collection(&self) -> Result<Collection<Document>, StorageError> {
        let database = self.database().await?;
        Ok(database.collection::<Document>(&self.settings.collection))
    }

    async fn connect(&self) -> Result<Database, StorageError> {
        let uri = self
            .settings
            .uri
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| StorageError::NotConfigured {
                reason: "no connection string configured".to_owned(),
            })?;

        let timeout = self.settings.connect_timeout;
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        let attempt = async {
            let mut options = ClientOptions::parse(uri)
                .await
                .map_err(|e| StorageError::Connect {
                    reason: format!("invalid connection string: {}", e.kind),
                })?;
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);

            let client = Client::with_options(options).map_err(|e| StorageError::Connect {
                reason: e.kind.to_string(),
            })?;
            let database = client.database(&self.settings.database);

            database
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(|e| StorageError::Connect {
                    reason: format!("ping failed: {}", e.kind),
                })?;

            Ok::<_, StorageError>(database)
        };

        let database = tokio::time::timeout(timeout, attempt)
            .await
            .map_err(|_| StorageError::Timeout { timeout_ms })??;

        info!(
            uri = %"[redacted]",
            database = %self.settings.database,
            collection = %self.settings.collection,
            "connected to MongoDB"
        );

        Ok(database)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, id: &str) -> Result<Option<JsonObject>, StorageError> {
        let collection = self.collection().await?;
        let found = collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| StorageError::Read {
                id: id.to_owned(),
                reason: e.kind.to_string(),
            })?;

        found.map(document_to_json).transpose()
    }

    async fn replace(&self, id: &str, body: JsonObject) -> Result<(), StorageError> {
        let collection = self.collection().await?;
        let replacement = json_to_document(&with_identity(id, body))?;

        let result = collection
            .replace_one(doc! { "_id": id }, replacement)
            .upsert(true)
            .await
            .map_err(|e| StorageError::Write {
                id: id.to_owned(),
                reason: e.kind.to_string(),
            })?;

        debug!(
            id,
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "document replaced"
        );
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let database = self.database().await?;
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::Connect {
                reason: format!("ping failed: {}", e.kind),
            })?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

fn document_to_json(document: Document) -> Result<JsonObject, StorageError> {
    match Bson::Document(document).into_relaxed_extjson() {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StorageError::Encoding {
            reason: format!("expected a document, got {other}"),
        }),
    }
}

fn json_to_document(body: &JsonObject) -> Result<Document, StorageError> {
    bson::to_document(body).map_err(|e| StorageError::Encoding {
        reason: e.to_string(),
    })
}

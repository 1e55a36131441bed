//! In-memory document store.
//!
//! Stores all documents in a `HashMap` behind a `RwLock`. It is not
//! persistent: all data is lost when the process exits. Use this for local
//! development and for tests that need a real store without a database.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{DocumentStore, JsonObject, StorageError, with_identity};

/// An in-memory document store.
///
/// Cloning shares the underlying map, so a clone observes every write made
/// through the original.
///
/// # Examples
///
/// ```
/// # use folio_storage::{DocumentStore, JsonObject, MemoryStore};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.replace("portfolio", JsonObject::new()).await.unwrap();
/// assert!(store.find("portfolio").await.unwrap().is_some());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, JsonObject>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, id: &str) -> Result<Option<JsonObject>, StorageError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).cloned())
    }

    async fn replace(&self, id: &str, body: JsonObject) -> Result<(), StorageError> {
        let stored = with_identity(id, body);
        let mut documents = self.documents.write().await;
        documents.insert(id.to_owned(), stored);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

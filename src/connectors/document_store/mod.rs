//! Collection/document abstraction over the external store.
//!
//! A document is an id plus a JSON object body. The id is owned by the store and
//! never appears inside the body.

use crate::connectors::config::{DocumentStoreConfig, StoreBackend};
use crate::connectors::errors::ConnectorError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod credentials;
pub mod firestore;
pub mod memory;
mod value;

pub use credentials::{Credentials, ServiceAccountKey};
pub use firestore::FirestoreClient;
pub use memory::MemoryDocumentStore;

pub const REGISTRATIONS: &str = "registrations";
pub const SPEAKERS: &str = "speakers";
pub const SESSIONS: &str = "sessions";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of a collection; an unknown collection is empty.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, ConnectorError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ConnectorError>;

    /// Store a new document under a store-generated id and return that id.
    async fn add(&self, collection: &str, data: Value) -> Result<String, ConnectorError>;

    /// Replace the body of an existing document.
    /// Fails with [`ConnectorError::NotFound`] when the document does not exist.
    async fn replace(&self, collection: &str, id: &str, data: Value) -> Result<(), ConnectorError>;

    /// Fails with [`ConnectorError::NotFound`] when the document does not exist.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), ConnectorError>;
}

fn ensure_object(data: &Value) -> Result<(), ConnectorError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(ConnectorError::Internal(
            "document body must be a JSON object".to_string(),
        ))
    }
}

/// Build the document store from configuration.
///
/// # Example
/// ```ignore
/// // In main.rs
/// let store = connectors::init_document_store(&settings.document_store)?;
/// startup::run(listener, settings, store).await?
/// ```
pub fn init(config: &DocumentStoreConfig) -> Result<Arc<dyn DocumentStore>, ConnectorError> {
    match config.backend {
        Some(StoreBackend::Firestore) => {
            tracing::info!(
                base_url = %config.base_url,
                project_id = %config.project_id,
                workshop_id = %config.workshop_id,
                credentials = ?config.credentials,
                "Initializing Firestore document store"
            );
            Ok(Arc::new(FirestoreClient::new(config.clone())?))
        }
        Some(StoreBackend::Memory) => {
            tracing::warn!("Using the in-memory document store - data is lost on restart");
            Ok(Arc::new(MemoryDocumentStore::default()))
        }
        None => Err(ConnectorError::Internal(
            "no document store configured".to_string(),
        )),
    }
}

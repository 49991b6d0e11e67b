//! External Service Connectors
//!
//! All persistent state lives in an external document store. Routes and the `db`
//! layer only ever see the [`DocumentStore`] trait, so the backing service can be
//! swapped (Firestore in production, in-memory for local runs and tests).
//!
//! ## Architecture Pattern
//!
//! 1. Trait in `document_store/mod.rs` → allows swapping the backend in tests
//! 2. HTTP client in `document_store/firestore.rs`
//! 3. Configuration in `config.rs` → backend and credentials per environment
//! 4. Token refresh in `document_store/credentials.rs`
//! 5. Inject the trait object into routes → routes never depend on HTTP details
//!
//! ## Usage in Routes
//!
//! ```ignore
//! pub async fn list(store: web::Data<Arc<dyn DocumentStore>>) -> Result<impl Responder> {
//!     let docs = store.list(document_store::SPEAKERS).await?;
//! }
//! ```

pub mod config;
pub mod document_store;
pub mod errors;

pub use config::{DocumentStoreConfig, StoreBackend};
pub use document_store::{
    Credentials, Document, DocumentStore, FirestoreClient, MemoryDocumentStore, ServiceAccountKey,
};
pub use errors::ConnectorError;

pub use document_store::init as init_document_store;

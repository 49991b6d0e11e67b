use super::{fetch as fetch_document, fetch_all as fetch_documents, insert as insert_document};
use crate::connectors::document_store::REGISTRATIONS;
use crate::connectors::DocumentStore;
use crate::models;

pub async fn insert(
    store: &dyn DocumentStore,
    mut registration: models::Registration,
) -> Result<models::Registration, String> {
    registration.id = insert_document(store, REGISTRATIONS, &registration).await?;
    Ok(registration)
}

pub async fn fetch_all(store: &dyn DocumentStore) -> Result<Vec<models::Registration>, String> {
    fetch_documents(store, REGISTRATIONS).await
}

pub async fn fetch(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<models::Registration>, String> {
    fetch_document(store, REGISTRATIONS, id).await
}

/// Counts stored documents, including ones that no longer decode as registrations.
pub async fn count(store: &dyn DocumentStore) -> Result<usize, String> {
    store
        .list(REGISTRATIONS)
        .await
        .map(|documents| documents.len())
        .map_err(|err| super::store_error("count", REGISTRATIONS, err))
}

use super::{delete as delete_document, fetch_all as fetch_documents, insert as insert_document, replace};
use crate::connectors::document_store::SPEAKERS;
use crate::connectors::DocumentStore;
use crate::models;

pub async fn fetch_all(store: &dyn DocumentStore) -> Result<Vec<models::Speaker>, String> {
    fetch_documents(store, SPEAKERS).await
}

pub async fn insert(
    store: &dyn DocumentStore,
    mut speaker: models::Speaker,
) -> Result<models::Speaker, String> {
    speaker.id = insert_document(store, SPEAKERS, &speaker).await?;
    Ok(speaker)
}

/// `Ok(None)` when the speaker does not exist.
pub async fn update(
    store: &dyn DocumentStore,
    speaker: models::Speaker,
) -> Result<Option<models::Speaker>, String> {
    replace(store, SPEAKERS, &speaker.id, &speaker)
        .await
        .map(|found| found.then_some(speaker))
}

pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, String> {
    delete_document(store, SPEAKERS, id).await
}

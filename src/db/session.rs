use super::{delete as delete_document, fetch_all as fetch_documents, insert as insert_document, replace};
use crate::connectors::document_store::SESSIONS;
use crate::connectors::DocumentStore;
use crate::models;

pub async fn fetch_all(store: &dyn DocumentStore) -> Result<Vec<models::Session>, String> {
    fetch_documents(store, SESSIONS).await
}

pub async fn insert(
    store: &dyn DocumentStore,
    mut session: models::Session,
) -> Result<models::Session, String> {
    session.id = insert_document(store, SESSIONS, &session).await?;
    Ok(session)
}

/// `Ok(None)` when the session does not exist.
pub async fn update(
    store: &dyn DocumentStore,
    session: models::Session,
) -> Result<Option<models::Session>, String> {
    replace(store, SESSIONS, &session.id, &session)
        .await
        .map(|found| found.then_some(session))
}

pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, String> {
    delete_document(store, SESSIONS, id).await
}

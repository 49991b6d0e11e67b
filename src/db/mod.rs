//! Typed access to the document store collections.
//!
//! Functions return `Result<_, String>`: the error is already logged and the
//! string is safe to hand to the client. Missing documents are `None`/`false`.

pub mod registration;
pub mod session;
pub mod speaker;

use crate::connectors::{ConnectorError, Document, DocumentStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

/// Attach the document id and decode the body into `T`.
/// Documents that do not decode are logged and yield `None`.
fn decode<T: DeserializeOwned>(collection: &str, document: Document) -> Option<T> {
    let Document { id, mut data } = document;
    match data.as_object_mut() {
        Some(map) => {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        None => {
            tracing::warn!(collection, id = %id, "skipping document with a non-object body");
            return None;
        }
    }

    serde_json::from_value(data)
        .map_err(|err| tracing::warn!(collection, id = %id, "skipping undecodable document: {}", err))
        .ok()
}

/// Serialize `item` as a document body; the id is never stored in the body.
fn encode<T: Serialize>(item: &T) -> Result<Value, String> {
    let mut value = serde_json::to_value(item).map_err(|err| {
        tracing::error!("Failed to serialize document: {:?}", err);
        "Failed to serialize document".to_string()
    })?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

fn store_error(action: &str, collection: &str, err: ConnectorError) -> String {
    tracing::error!(collection, "Failed to {} documents: {}", action, err);
    format!("Failed to {} {}", action, collection)
}

async fn fetch_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<T>, String> {
    let span = tracing::info_span!("Fetching all documents", collection);
    store
        .list(collection)
        .instrument(span)
        .await
        .map(|documents| {
            documents
                .into_iter()
                .filter_map(|document| decode(collection, document))
                .collect()
        })
        .map_err(|err| store_error("fetch", collection, err))
}

async fn fetch<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, String> {
    let span = tracing::info_span!("Fetching document", collection, id);
    let document = store
        .get(collection, id)
        .instrument(span)
        .await
        .map_err(|err| store_error("fetch", collection, err))?;

    match document {
        Some(document) => decode(collection, document)
            .map(Some)
            .ok_or_else(|| format!("Failed to parse {} data", collection)),
        None => Ok(None),
    }
}

async fn insert<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    item: &T,
) -> Result<String, String> {
    let body = encode(item)?;
    let span = tracing::info_span!("Saving new document", collection);
    store
        .add(collection, body)
        .instrument(span)
        .await
        .map_err(|err| store_error("create", collection, err))
}

/// `Ok(false)` when there is no document with `id`.
async fn replace<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    item: &T,
) -> Result<bool, String> {
    let body = encode(item)?;
    let span = tracing::info_span!("Replacing document", collection, id);
    match store.replace(collection, id, body).instrument(span).await {
        Ok(()) => Ok(true),
        Err(ConnectorError::NotFound(_)) => Ok(false),
        Err(err) => Err(store_error("update", collection, err)),
    }
}

/// `Ok(false)` when there is no document with `id`.
async fn delete(store: &dyn DocumentStore, collection: &str, id: &str) -> Result<bool, String> {
    let span = tracing::info_span!("Deleting document", collection, id);
    match store.delete(collection, id).instrument(span).await {
        Ok(()) => Ok(true),
        Err(ConnectorError::NotFound(_)) => Ok(false),
        Err(err) => Err(store_error("delete", collection, err)),
    }
}

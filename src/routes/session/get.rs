use crate::connectors::DocumentStore;
use crate::db;
use crate::helpers::ApiError;
use actix_web::{get, web, HttpResponse, Responder, Result};
use std::sync::Arc;

/// Every session; an empty collection is `[]`.
#[tracing::instrument(name = "Get all sessions.", skip(store))]
#[get("")]
pub async fn list(store: web::Data<Arc<dyn DocumentStore>>) -> Result<impl Responder, ApiError> {
    db::session::fetch_all(store.get_ref().as_ref())
        .await
        .map(|sessions| HttpResponse::Ok().json(sessions))
        .map_err(ApiError::internal)
}

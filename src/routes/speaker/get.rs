use crate::connectors::DocumentStore;
use crate::db;
use crate::helpers::ApiError;
use actix_web::{get, web, HttpResponse, Responder, Result};
use std::sync::Arc;

/// Every speaker; an empty collection is `[]`.
#[tracing::instrument(name = "Get all speakers.", skip(store))]
#[get("")]
pub async fn list(store: web::Data<Arc<dyn DocumentStore>>) -> Result<impl Responder, ApiError> {
    db::speaker::fetch_all(store.get_ref().as_ref())
        .await
        .map(|speakers| HttpResponse::Ok().json(speakers))
        .map_err(ApiError::internal)
}

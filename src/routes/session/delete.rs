use crate::connectors::DocumentStore;
use crate::db;
use crate::helpers::ApiError;
use actix_web::{delete, web, HttpResponse, Responder, Result};
use serde_json::json;
use std::sync::Arc;

#[tracing::instrument(name = "Delete session.", skip(store))]
#[delete("/{id}")]
pub async fn item(
    path: web::Path<(String,)>,
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    let (id,) = path.into_inner();

    db::session::delete(store.get_ref().as_ref(), &id)
        .await
        .map_err(ApiError::internal)
        .and_then(|deleted| match deleted {
            true => Ok(HttpResponse::Ok().json(json!({ "message": "session deleted successfully" }))),
            false => Err(ApiError::not_found("session not found")),
        })
}

use crate::connectors::DocumentStore;
use crate::db;
use crate::helpers::ApiError;
use actix_web::{get, web, HttpResponse, Responder, Result};
use std::sync::Arc;

#[tracing::instrument(name = "Get all attendees.", skip(store))]
#[get("")]
pub async fn list(store: web::Data<Arc<dyn DocumentStore>>) -> Result<impl Responder, ApiError> {
    db::registration::fetch_all(store.get_ref().as_ref())
        .await
        .map(|attendees| HttpResponse::Ok().json(attendees))
        .map_err(ApiError::internal)
}

#[tracing::instrument(name = "Get attendee.", skip(store))]
#[get("/{id}")]
pub async fn item(
    path: web::Path<(String,)>,
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    let (id,) = path.into_inner();

    db::registration::fetch(store.get_ref().as_ref(), &id)
        .await
        .map_err(ApiError::internal)?
        .map(|attendee| HttpResponse::Ok().json(attendee))
        .ok_or_else(|| ApiError::not_found("attendee not found"))
}

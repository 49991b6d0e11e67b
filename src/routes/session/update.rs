use crate::connectors::DocumentStore;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models;
use actix_web::{put, web, HttpResponse, Responder, Result};
use serde_valid::Validate;
use std::sync::Arc;

#[tracing::instrument(name = "Update session.", skip(store))]
#[put("/{id}")]
pub async fn item(
    path: web::Path<(String,)>,
    form: web::Json<forms::SessionForm>,
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    if let Err(errors) = form.validate() {
        return Err(ApiError::validation(errors.to_string()));
    }

    let mut session: models::Session = form.into_inner().into();
    session.id = path.into_inner().0;

    match db::session::update(store.get_ref().as_ref(), session).await {
        Ok(Some(session)) => Ok(HttpResponse::Ok().json(session)),
        Ok(None) => Err(ApiError::not_found("session not found")),
        Err(err) => Err(ApiError::internal(err)),
    }
}

use crate::connectors::DocumentStore;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models;
use actix_web::{post, web, HttpResponse, Responder, Result};
use serde_valid::Validate;
use std::sync::Arc;

#[tracing::instrument(name = "Add session.", skip(store))]
#[post("")]
pub async fn item(
    form: web::Json<forms::SessionForm>,
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    if let Err(errors) = form.validate() {
        return Err(ApiError::validation(errors.to_string()));
    }

    let session: models::Session = form.into_inner().into();
    db::session::insert(store.get_ref().as_ref(), session)
        .await
        .map(|session| HttpResponse::Created().json(session))
        .map_err(ApiError::internal)
}

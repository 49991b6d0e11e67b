use crate::connectors::DocumentStore;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models;
use actix_web::{post, web, HttpResponse, Responder, Result};
use serde_valid::Validate;
use std::sync::Arc;

#[tracing::instrument(name = "Add speaker.", skip(store))]
#[post("")]
pub async fn item(
    form: web::Json<forms::SpeakerForm>,
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    if let Err(errors) = form.validate() {
        return Err(ApiError::validation(errors.to_string()));
    }

    let speaker: models::Speaker = form.into_inner().into();
    db::speaker::insert(store.get_ref().as_ref(), speaker)
        .await
        .map(|speaker| HttpResponse::Created().json(speaker))
        .map_err(ApiError::internal)
}

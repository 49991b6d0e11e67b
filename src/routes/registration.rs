use crate::connectors::DocumentStore;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use actix_web::{get, post, web, HttpResponse, Responder, Result};
use chrono::Utc;
use serde_json::json;
use serde_valid::Validate;
use std::sync::Arc;

#[tracing::instrument(name = "Register attendee.", skip(store))]
#[post("/register")]
pub async fn register(
    form: web::Json<forms::RegistrationForm>,
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    if let Err(errors) = form.validate() {
        let errors = errors.to_string();
        tracing::debug!("Invalid registration received {}", errors);
        return Err(ApiError::validation(errors));
    }

    let registration = form.into_inner().into_model(Utc::now());
    db::registration::insert(store.get_ref().as_ref(), registration)
        .await
        .map(|registration| HttpResponse::Created().json(registration))
        .map_err(ApiError::internal)
}

#[tracing::instrument(name = "Count registrations.", skip(store))]
#[get("/registrations/count")]
pub async fn count(store: web::Data<Arc<dyn DocumentStore>>) -> Result<impl Responder, ApiError> {
    db::registration::count(store.get_ref().as_ref())
        .await
        .map(|count| HttpResponse::Ok().json(json!({ "count": count })))
        .map_err(ApiError::internal)
}

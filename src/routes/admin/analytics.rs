use crate::connectors::DocumentStore;
use crate::db;
use crate::helpers::ApiError;
use crate::models::DesignationBreakdown;
use actix_web::{get, web, HttpResponse, Responder, Result};
use std::sync::Arc;

#[tracing::instrument(name = "Designation breakdown.", skip(store))]
#[get("/analytics/designations")]
pub async fn designations(
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    let registrations = db::registration::fetch_all(store.get_ref().as_ref())
        .await
        .map_err(ApiError::internal)?;

    Ok(HttpResponse::Ok().json(DesignationBreakdown::from_registrations(&registrations)))
}

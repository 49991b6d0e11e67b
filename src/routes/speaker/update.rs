use crate::connectors::DocumentStore;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models;
use actix_web::{put, web, HttpResponse, Responder, Result};
use serde_valid::Validate;
use std::sync::Arc;

#[tracing::instrument(name = "Update speaker.", skip(store))]
#[put("/{id}")]
pub async fn item(
    path: web::Path<(String,)>,
    form: web::Json<forms::SpeakerForm>,
    store: web::Data<Arc<dyn DocumentStore>>,
) -> Result<impl Responder, ApiError> {
    if let Err(errors) = form.validate() {
        return Err(ApiError::validation(errors.to_string()));
    }

    let mut speaker: models::Speaker = form.into_inner().into();
    speaker.id = path.into_inner().0;

    match db::speaker::update(store.get_ref().as_ref(), speaker).await {
        Ok(Some(speaker)) => Ok(HttpResponse::Ok().json(speaker)),
        Ok(None) => Err(ApiError::not_found("speaker not found")),
        Err(err) => Err(ApiError::internal(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::MemoryDocumentStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn replaces_existing_speaker_only() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let existing = db::speaker::insert(
            store.as_ref(),
            models::Speaker {
                name: "Ada".to_string(),
                bio: "Analyst".to_string(),
                ..models::Speaker::default()
            },
        )
        .await
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store.clone()))
                .service(web::scope("/speakers").service(item)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/speakers/{}", existing.id))
            .set_json(json!({ "name": "Ada Lovelace", "bio": "Mathematician" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({ "id": existing.id, "name": "Ada Lovelace", "bio": "Mathematician" })
        );

        let req = test::TestRequest::put()
            .uri("/speakers/missing")
            .set_json(json!({ "name": "Nobody" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "speaker not found" }));

        let speakers = db::speaker::fetch_all(store.as_ref()).await.unwrap();
        assert_eq!(speakers.len(), 1);
    }
}

use crate::forms;
use crate::helpers::ApiError;
use crate::services::AdminAuth;
use actix_web::{post, web, HttpResponse, Responder, Result};
use chrono::Utc;
use serde_json::json;

/// A body that is not a JSON object is treated like a missing password.
#[tracing::instrument(name = "Admin login.", skip_all)]
#[post("/login")]
pub async fn handler(
    form: Option<web::Json<forms::LoginForm>>,
    auth: web::Data<AdminAuth>,
) -> Result<impl Responder, ApiError> {
    let form = form.map(web::Json::into_inner).unwrap_or_default();

    auth.login(form.password.as_deref(), Utc::now())
        .map(|token| HttpResponse::Ok().json(json!({ "token": token })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::jwt;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    async fn login(body: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AdminAuth::new("test-password")))
                .service(handler),
        )
        .await;
        let resp = test::call_service(&app, body.uri("/login").to_request()).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn correct_password_yields_a_verifiable_token() {
        let (status, body) = login(
            test::TestRequest::post().set_json(json!({ "password": "test-password" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap();
        let claims = jwt::verify(token, "test-password", Utc::now()).unwrap();
        assert!(claims.admin);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized() {
        let (status, body) = login(
            test::TestRequest::post().set_json(json!({ "password": "wrong-password" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "invalid password" }));
    }

    #[actix_web::test]
    async fn missing_or_unreadable_password_is_a_validation_error() {
        let requests = [
            test::TestRequest::post().set_json(json!({ "password": "" })),
            test::TestRequest::post().set_json(json!({})),
            test::TestRequest::post()
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json"),
            test::TestRequest::post(),
        ];

        for request in requests {
            let (status, body) = login(request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "password is required" }));
        }
    }
}

mod common;

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use workshop::helpers::jwt;

const PROTECTED: &str = "/api/admin/attendees";

#[tokio::test]
async fn login_with_the_configured_password_returns_a_token() {
    let app = common::spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.url("/api/admin/login"))
        .json(&json!({ "password": "test-password" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::OK, response.status());
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert!(jwt::verify(token, common::ADMIN_PASSWORD, Utc::now()).is_ok());
}

#[tokio::test]
async fn login_with_a_wrong_password_is_unauthorized() {
    let app = common::spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.url("/api/admin/login"))
        .json(&json!({ "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "invalid password" }));
}

#[tokio::test]
async fn login_without_a_password_is_a_bad_request() {
    let app = common::spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.url("/api/admin/login"))
        .json(&json!({ "password": "" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "password is required" }));
}

#[tokio::test]
async fn protected_route_without_a_header_is_unauthorized() {
    let app = common::spawn_app().await;

    let response = reqwest::Client::new()
        .get(app.url(PROTECTED))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "authorization header required" }));
}

#[tokio::test]
async fn protected_route_admits_bearer_and_bare_tokens() {
    let app = common::spawn_app().await;
    let token = app.login().await;
    let client = reqwest::Client::new();

    for header in [format!("Bearer {}", token), token.clone()] {
        let response = client
            .get(app.url(PROTECTED))
            .header("Authorization", header)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(StatusCode::OK, response.status());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn protected_route_rejects_bad_tokens_with_distinct_messages() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    let expired = jwt::issue(common::ADMIN_PASSWORD, Utc::now() - Duration::hours(25)).unwrap();
    let foreign = jwt::issue("another-secret", Utc::now()).unwrap();

    let cases = [
        ("garbage".to_string(), "invalid token"),
        (format!("Bearer {}", foreign), "invalid token"),
        (format!("Bearer {}", expired), "token expired"),
    ];

    for (header, message) in cases {
        let response = client
            .get(app.url(PROTECTED))
            .header("Authorization", header)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(StatusCode::UNAUTHORIZED, response.status());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": message }));
    }
}

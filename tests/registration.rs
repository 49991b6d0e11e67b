mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn registered_attendees_are_counted_and_listed() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(app.url("/api/register"))
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "designation": "Engineer" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::CREATED, response.status());
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["email"], "ada@example.com");

    let count: Value = client
        .get(app.url("/api/registrations/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, json!({ "count": 1 }));

    let token = app.login().await;
    let attendee: Value = client
        .get(app.url(&format!("/api/admin/attendees/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(attendee, created);

    let response = client
        .get(app.url("/api/admin/attendees/missing"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::NOT_FOUND, response.status());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "attendee not found" }));
}

#[tokio::test]
async fn invalid_registrations_are_rejected() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    let bodies = [
        json!({ "email": "ada@example.com", "designation": "Engineer" }),
        json!({ "name": "Ada", "email": "not-an-email", "designation": "Engineer" }),
        json!({ "name": "Ada", "email": "ada@example.com" }),
    ];

    for body in bodies {
        let response = client
            .post(app.url("/api/register"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(StatusCode::BAD_REQUEST, response.status(), "body: {}", body);
        let error: Value = response.json().await.unwrap();
        assert!(error["error"].is_string());
    }

    assert!(app.store.list("registrations").await.unwrap().is_empty());
}

#[tokio::test]
async fn designation_breakdown_counts_registrations() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    for (name, designation) in [("Ada", "Engineer"), ("Grace", "Engineer"), ("Linus", "Student")] {
        let response = client
            .post(app.url("/api/register"))
            .json(&json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "designation": designation,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(StatusCode::CREATED, response.status());
    }

    let token = app.login().await;
    let breakdown: Value = client
        .get(app.url("/api/admin/analytics/designations"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        breakdown,
        json!([
            { "designation": "Engineer", "count": 2 },
            { "designation": "Student", "count": 1 },
        ])
    );
}

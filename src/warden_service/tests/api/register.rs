use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_return_201_with_token_and_no_password() {
    let app = TestApp::new().await;

    let response = app
        .post_register(&json!({
            "name": "Ivan Ivanov",
            "date_of_birth": "1990-01-01",
            "email": "ivan@example.com",
            "password": "password123",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Ivan Ivanov");
    assert_eq!(body["email"], "ivan@example.com");
    assert!(body["id"].is_string());
    assert!(body["created_at"].is_string());
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn should_return_400_for_invalid_input() {
    let app = TestApp::new().await;

    let test_cases = [
        json!({ "name": "Ivan", "date_of_birth": "1990-01-01", "email": "not-an-email", "password": "password123" }),
        json!({ "name": "Ivan", "date_of_birth": "1990-01-01", "email": "ivan@example.com", "password": "short" }),
        json!({ "name": "I", "date_of_birth": "1990-01-01", "email": "ivan@example.com", "password": "password123" }),
        json!({ "name": "Ivan", "date_of_birth": "01/01/1990", "email": "ivan@example.com", "password": "password123" }),
        json!({ "name": "Ivan", "date_of_birth": "2099-01-01", "email": "ivan@example.com", "password": "password123" }),
        json!({ "date_of_birth": "1990-01-01", "email": "ivan@example.com", "password": "password123" }),
        json!({ "name": "Ivan", "date_of_birth": "1990-01-01", "email": "ivan@example.com" }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_register(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            test_case
        );
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn should_return_400_for_malformed_json() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .post(format!("{}/register", &app.address))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid JSON format");
}

#[tokio::test]
async fn should_return_409_for_duplicate_email_and_keep_first_user() {
    let app = TestApp::new().await;
    let (first_id, _) = app
        .register("First User", "taken@example.com", "password123")
        .await;

    let response = app
        .post_register(&json!({
            "name": "Second User",
            "date_of_birth": "1985-05-05",
            "email": "taken@example.com",
            "password": "another-password",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Email already registered");

    // The first registration still logs in and resolves to the first user.
    let login = app.login("taken@example.com", "password123").await;
    assert_eq!(login["user"]["id"], first_id.as_str());
    assert_eq!(login["user"]["name"], "First User");
}

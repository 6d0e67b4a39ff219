use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn owner_can_read_own_profile() {
    let app = TestApp::new().await;
    let (id, _) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;
    let login = app.login("alice@example.com", "password123").await;
    let token = login["token"].as_str().unwrap();

    let response = app.get_user(&id, Some(token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn registration_token_grants_access() {
    let app = TestApp::new().await;
    let (id, token) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;

    let response = app.get_user(&id, Some(&token)).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn other_standard_user_is_forbidden() {
    let app = TestApp::new().await;
    let (alice_id, _) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;
    let (_, bob_token) = app
        .register("Bob Example", "bob@example.com", "password123")
        .await;

    let response = app.get_user(&alice_id, Some(&bob_token)).await;

    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
async fn admin_can_read_any_profile() {
    let app = TestApp::new().await;
    let (alice_id, _) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;
    let admin_token = app.admin_token("root@example.com", "password123").await;

    let response = app.get_user(&alice_id, Some(&admin_token)).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn missing_or_bad_credentials_are_401() {
    let app = TestApp::new().await;
    let (id, token) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;

    let missing = app.get_user(&id, None).await;
    assert_eq!(missing.status().as_u16(), 401);

    let garbage = app.get_user(&id, Some("not-a-jwt")).await;
    assert_eq!(garbage.status().as_u16(), 401);

    let wrong_scheme = app
        .http_client
        .get(format!("{}/users/{id}", &app.address))
        .header("authorization", format!("Basic {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_scheme.status().as_u16(), 401);
}

#[tokio::test]
async fn invalid_user_id_is_400_and_unknown_is_404() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token("root@example.com", "password123").await;

    let invalid = app.get_user("not-a-uuid", Some(&admin_token)).await;
    assert_eq!(invalid.status().as_u16(), 400);

    let unknown = app
        .get_user("3f2504e0-4f89-41d3-9a0c-0305e82c3301", Some(&admin_token))
        .await;
    assert_eq!(unknown.status().as_u16(), 404);
}

#[tokio::test]
async fn owner_can_update_and_log_in_with_new_credentials() {
    let app = TestApp::new().await;
    let (id, token) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;
    // Warm the caches so the update has something to invalidate.
    app.get_user(&id, Some(&token)).await;
    app.login("alice@example.com", "password123").await;

    let response = app
        .put_user(
            &id,
            &token,
            &json!({ "email": "alice@new.example.com", "password": "new-password-456" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "alice@new.example.com");
    assert_eq!(body["name"], "Alice Example");

    let old = app
        .post_login(&json!({ "email": "alice@example.com", "password": "password123" }))
        .await;
    assert_eq!(old.status().as_u16(), 401);

    let login = app.login("alice@new.example.com", "new-password-456").await;
    assert_eq!(login["user"]["id"], id.as_str());

    let fresh = app.get_user(&id, Some(&token)).await;
    let body: Value = fresh.json().await.unwrap();
    assert_eq!(body["email"], "alice@new.example.com");
}

#[tokio::test]
async fn update_to_taken_email_is_409() {
    let app = TestApp::new().await;
    app.register("Alice Example", "alice@example.com", "password123")
        .await;
    let (bob_id, bob_token) = app
        .register("Bob Example", "bob@example.com", "password123")
        .await;

    let response = app
        .put_user(&bob_id, &bob_token, &json!({ "email": "alice@example.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn update_validates_supplied_fields() {
    let app = TestApp::new().await;
    let (id, token) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;

    let response = app
        .put_user(&id, &token, &json!({ "date_of_birth": "yesterday" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn delete_removes_user_and_cached_copies() {
    let app = TestApp::new().await;
    let (id, token) = app
        .register("Alice Example", "alice@example.com", "password123")
        .await;
    app.get_user(&id, Some(&token)).await;
    assert!(!app.cache.is_empty());

    let response = app.delete_user(&id, &token).await;
    assert_eq!(response.status().as_u16(), 204);
    assert!(app.cache.is_empty());

    let gone = app.get_user(&id, Some(&token)).await;
    assert_eq!(gone.status().as_u16(), 404);

    let login = app
        .post_login(&json!({ "email": "alice@example.com", "password": "password123" }))
        .await;
    assert_eq!(login.status().as_u16(), 401);

    let again = app.delete_user(&id, &token).await;
    assert_eq!(again.status().as_u16(), 404);
}

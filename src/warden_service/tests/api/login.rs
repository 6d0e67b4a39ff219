use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn should_return_200_with_token_and_profile() {
    let app = TestApp::new().await;
    let (id, _) = app
        .register("Ada Lovelace", "ada@example.com", "password123")
        .await;

    let body = app.login("ada@example.com", "password123").await;

    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    assert_eq!(body["user"]["id"], id.as_str());
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "standard-user");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn should_return_401_with_same_message_for_any_credential_failure() {
    let app = TestApp::new().await;
    app.register("Ada Lovelace", "ada@example.com", "password123")
        .await;

    let test_cases = [
        json!({ "email": "ada@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": "password123" }),
        json!({ "email": "not-an-email", "password": "password123" }),
        json!({ "email": "ada@example.com" }),
    ];

    let mut messages = Vec::new();
    for test_case in test_cases.iter() {
        let response = app.post_login(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            401,
            "Failed for input: {:?}",
            test_case
        );
        let body: Value = response.json().await.unwrap();
        messages.push(body["error"].as_str().unwrap().to_owned());
    }

    assert!(messages.iter().all(|message| message == "Invalid credentials"));
}

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Response};
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use warden_adapters::{
    Argon2Hasher, HashMapUserCache, HashMapUserRepository, JwtTokenCodec, JwtTokenConfig,
    config::test,
};
use warden_application::{AuthorizationGate, CacheAsideUserStore};
use warden_axum::AppState;
use chrono::Utc;
use warden_core::{
    DateOfBirth, Email, Password, PasswordHasher, Role, SystemClock, User, UserName,
    UserRepository,
};
use warden_service::{RequestMetrics, UserService, init_metrics, metric_names};

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub repository: HashMapUserRepository,
    pub cache: HashMapUserCache,
}

impl TestApp {
    pub async fn new() -> Self {
        let repository = HashMapUserRepository::new();
        let cache = HashMapUserCache::new();
        let user_store = CacheAsideUserStore::new(repository.clone(), cache.clone());
        let token_codec = JwtTokenCodec::new(JwtTokenConfig::new(
            Secret::new(test::TOKEN_SECRET.to_owned()),
            "1h",
        ));

        let state = AppState::new(
            user_store,
            Argon2Hasher::new(),
            AuthorizationGate::new(token_codec),
            Arc::new(SystemClock),
        );

        let listener = TcpListener::bind(test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());
        let router = UserService::new(state)
            .with_metrics(RequestMetrics::new(metric_names::APP_NAME, init_metrics()))
            .as_nested_router(None, Duration::from_secs(10));

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        Self {
            address,
            http_client: Client::new(),
            repository,
            cache,
        }
    }

    pub async fn post_register<Body: serde::Serialize>(&self, body: &Body) -> Response {
        self.http_client
            .post(format!("{}/register", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_metrics(&self) -> Response {
        self.http_client
            .get(format!("{}/metrics", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login<Body: serde::Serialize>(&self, body: &Body) -> Response {
        self.http_client
            .post(format!("{}/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_user(&self, id: &str, token: Option<&str>) -> Response {
        let mut request = self.http_client.get(format!("{}/users/{id}", &self.address));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn put_user<Body: serde::Serialize>(
        &self,
        id: &str,
        token: &str,
        body: &Body,
    ) -> Response {
        self.http_client
            .put(format!("{}/users/{id}", &self.address))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_user(&self, id: &str, token: &str) -> Response {
        self.http_client
            .delete(format!("{}/users/{id}", &self.address))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Registers a user and returns `(id, token)` from the registration response.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let response = self
            .post_register(&json!({
                "name": name,
                "date_of_birth": "1990-01-01",
                "email": email,
                "password": password,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        (
            body["id"].as_str().unwrap().to_owned(),
            body["token"].as_str().unwrap().to_owned(),
        )
    }

    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .post_login(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.unwrap()
    }

    /// Seeds an admin straight into the repository and logs in as it.
    pub async fn admin_token(&self, email: &str, password: &str) -> String {
        let now = Utc::now();
        let password_hash = Argon2Hasher::new()
            .hash(Password::try_from(Secret::new(password.to_owned())).unwrap())
            .await
            .unwrap();
        let admin = User::register(
            UserName::parse("Admin User").unwrap(),
            DateOfBirth::parse("1980-01-01", now.date_naive()).unwrap(),
            Email::parse(email).unwrap(),
            password_hash,
            now,
        )
        .with_role(Role::Admin);
        self.repository.create(admin).await.unwrap();

        let body = self.login(email, password).await;
        body["token"].as_str().unwrap().to_owned()
    }
}

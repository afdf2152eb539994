#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use codefolio::{
    auth::issue_token,
    config::{PageLimits, SecurityConfig},
    db::MemoryStore,
    routes::create_routes,
    state::AppState,
};
use serde_json::Value;
use std::sync::OnceLock;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only";

/// Test logging, controlled by `TEST_LOG` (falls back to `warn`). Safe to
/// call from every test.
pub fn init_logging() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = std::env::var("TEST_LOG").unwrap_or_else(|_| "warn".to_string());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_test_writer()
            .without_time()
            .try_init();
    });
}

pub fn security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes())
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

pub fn app() -> TestApp {
    init_logging();
    let store = MemoryStore::new();
    let state = AppState::new(store.clone(), security(), PageLimits::default());
    TestApp {
        router: create_routes(state),
        store,
    }
}

/// A token for `user_id` without going through register/login.
pub fn token_for(user_id: i32) -> String {
    issue_token(user_id, false, &security()).unwrap()
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/register",
            None,
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/login",
            None,
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn create_project(&self, token: &str, name: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/authorized/projects",
                Some(token),
                Some(serde_json::json!({ "name": name, "visibility": "public" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body
    }
}

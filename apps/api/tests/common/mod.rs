//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use kiosk_api::{bootstrap, build_router, AppConfig, AppState, SharedState};
use kiosk_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: SharedState,
}

pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub disposition: String,
    pub body: Vec<u8>,
}

/// Fresh in-memory app with the default admin login seeded.
pub async fn setup_test_app() -> TestApp {
    let config = AppConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..AppConfig::default()
    };

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = Arc::new(AppState::new(db, config));
    bootstrap(&state).await.unwrap();

    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send_raw(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> RawResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        let header_str = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let status = response.status();
        let content_type = header_str(header::CONTENT_TYPE);
        let disposition = header_str(header::CONTENT_DISPOSITION);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

        RawResponse {
            status,
            content_type,
            disposition,
            body,
        }
    }

    /// Sends a request and parses the JSON response body.
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let raw = self.send_raw(method, uri, token, body).await;
        let value = if raw.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&raw.body).unwrap()
        };
        (raw.status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Logs in as the seeded admin and returns the token.
    pub async fn login(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"phone": "admin", "password": "admin123"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a product and returns its id.
    pub async fn create_product(&self, token: &str, body: Value) -> i64 {
        let (status, product) = self.post("/products", token, body).await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", product);
        product["id"].as_i64().unwrap()
    }
}

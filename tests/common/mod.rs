//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use chrono::Duration;
use http_body_util::BodyExt;
use labtrack_backend::{
    auth::{Claims, encode_token},
    config::Config,
    handlers::AppState,
    models::{User, UserRole},
    repositories::{MemoryStore, UserRepository},
    routes::create_router,
    storage::LocalStorage,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "labtrack-test-boundary";

/// Router over a fresh in-memory store and a temporary upload directory
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    secret: String,
    _uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.file.upload_dir = uploads.path().to_string_lossy().into_owned();

        let store = Arc::new(MemoryStore::new());
        let storage = Arc::new(LocalStorage::new(uploads.path()).await.unwrap());
        let secret = config.auth.jwt_secret.clone();
        let state = AppState::new(store.clone(), storage, config);

        Self {
            router: create_router(state),
            store,
            secret,
            _uploads: uploads,
        }
    }

    /// Insert a verified user and return it with a bearer token
    pub async fn user(&self, name: &str, role: UserRole) -> (User, String) {
        let user = User::new(
            name.to_string(),
            format!("{}@lab.test", name.to_lowercase()),
            role,
            true,
        );
        let user = self.store.insert_user(user).await.unwrap();
        let claims = Claims::new(user.id, user.role, Duration::hours(1));
        let token = encode_token(&claims, &self.secret).unwrap();
        (user, token)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(token), None).await
    }

    /// POST with no body and no content type
    pub async fn post_empty(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("POST", uri, Some(token), None).await
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        self.send(method, uri, Some(token), Some(body)).await
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// POST a multipart form built by [`multipart_body`]
    pub async fn multipart(&self, uri: &str, token: &str, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.dispatch(request).await
    }

    pub async fn raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let (status, _, bytes) = self.raw_with_headers(request).await;
        (status, bytes)
    }

    pub async fn raw_with_headers(
        &self,
        request: Request<Body>,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, bytes.to_vec())
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.raw(request).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

/// Multipart body with text fields and an optional `(field, file name, content)` file part
pub fn multipart_body(fields: &[(&str, String)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((field, file_name, content)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n",
                BOUNDARY, field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

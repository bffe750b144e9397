use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::auth::{Claims, JwtKeys, Role};
use crate::database::Store;

pub const TEST_SECRET: &str = "test-secret";

/// In-process router over a fresh memory store
pub struct TestContext {
    pub store: Store,
    keys: Arc<JwtKeys>,
    router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_store(Store::memory())
    }

    pub fn with_store(store: Store) -> Self {
        let keys = Arc::new(JwtKeys::from_secret(TEST_SECRET).unwrap());
        let router = app(AppState {
            store: store.clone(),
            keys: keys.clone(),
        });

        Self { store, keys, router }
    }

    pub fn token(&self, roles: &[Role]) -> String {
        let claims = Claims::new("cgaucho@ucsb.edu", roles.to_vec(), 1).unwrap();
        self.keys.generate(&claims).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token(&[Role::Admin, Role::User])
    }

    /// Drive one request through the router; empty bodies come back as `Null`
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, value)
    }
}

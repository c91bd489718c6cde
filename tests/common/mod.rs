#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_identity::auth::{hash_password, TokenService};
use storefront_identity::database::models::identity::{Identity, Role};
use storefront_identity::database::MemoryCredentialStore;
use storefront_identity::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// The router plus the state behind it, so tests can reach the store and
/// token service directly when seeding or asserting.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_app() -> TestApp {
    let state = AppState::new(
        Arc::new(MemoryCredentialStore::new()),
        TokenService::new(TEST_SECRET, 24),
    );
    TestApp {
        router: app(state.clone()),
        state,
    }
}

/// Drive one request through the router and return status plus parsed body.
pub async fn request(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request build"),
        None => builder.body(Body::empty()).expect("request build"),
    };

    let response = router.clone().oneshot(request).await.expect("router oneshot");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, value)
}

/// Register an identity through the API, returning the `data` object
/// (token + public identity).
pub async fn register(
    router: &Router,
    name: &str,
    email: &str,
    handle: &str,
    password: &str,
) -> Value {
    let (status, body) = request(
        router,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "handle": handle,
            "password": password,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    body["data"].clone()
}

/// Log in through the API, returning the `data` object.
pub async fn login(router: &Router, identifier: &str, password: &str) -> Value {
    let (status, body) = request(
        router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "identifier": identifier, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"].clone()
}

/// Seed an administrator directly into the store (promotion normally happens
/// via an existing admin, so the first one is seeded out-of-band) and issue
/// a token for it.
pub async fn seed_admin(state: &AppState, email: &str, handle: &str, password: &str) -> (Identity, String) {
    let mut identity = Identity::new(
        "Admin",
        email,
        handle,
        hash_password(password).expect("hash"),
    );
    identity.role = Role::Administrator;

    let identity = state.store.insert(identity).await.expect("seed admin");
    let token = state
        .tokens
        .issue_default(identity.id, identity.role)
        .expect("issue admin token");

    (identity, token)
}

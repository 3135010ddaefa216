#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use sso::app::AppState;
use sso::auth::AuthService;
use sso::auth::password::{MIN_COST, PasswordHasher};
use sso::model::App;
use sso::store::memory::InMemoryStore;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_APP_ID: i32 = 1;
pub const TEST_APP_SECRET: &str = "test-secret";

pub fn test_app() -> App {
    App {
        id: TEST_APP_ID,
        name: "test".to_string(),
        secret: TEST_APP_SECRET.as_bytes().to_vec(),
    }
}

/// Memory store seeded with the test app, plus a service over it using the
/// cheapest bcrypt cost.
pub fn memory_service(token_ttl: Duration) -> (Arc<InMemoryStore>, AuthService) {
    let store = Arc::new(InMemoryStore::with_apps([test_app()]));
    let auth = AuthService::new(
        store.clone(),
        store.clone(),
        PasswordHasher::new(MIN_COST).expect("cost"),
        token_ttl,
    );
    (store, auth)
}

pub fn memory_state() -> (Arc<InMemoryStore>, AppState) {
    let (store, auth) = memory_service(Duration::from_secs(3600));
    let state = AppState {
        auth: Arc::new(auth),
        store: store.clone(),
        request_timeout: Duration::from_secs(5),
    };
    (store, state)
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use courier::config::Config;

/// Bootstrap credentials seeded by the initial migration
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";

pub async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    // Unroutable endpoint: deliveries fail fast without touching the network.
    config.telegram.api_base = "http://127.0.0.1:1".to_string();
    config.telegram.request_timeout_seconds = 2;

    let state = courier::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");

    courier::api::router(state)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

pub async fn signup(
    app: &Router,
    username: &str,
    password: &str,
    role: &str,
) -> (StatusCode, Value) {
    request(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({
            "username": username,
            "password": password,
            "role": role,
        })),
    )
    .await
}

pub async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/token",
        None,
        Some(json!({
            "username": username,
            "password": password,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    body["data"]["access_token"]
        .as_str()
        .expect("missing access_token")
        .to_string()
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use taskboard_api::auth::jwt::{JwtConfig, JwtTokenIssuer};
use taskboard_api::config::{LogFormat, ServerConfig, StorageConfig};
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_core::rights::ReadPolicy;
use taskboard_db::memory::MemoryStore;

/// Build a test `ServerConfig` with safe defaults on in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        storage: StorageConfig::Memory,
        cookie_secure: false,
        read_policy: ReadPolicy::Membership,
        log_format: LogFormat::Text,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_days: 7,
        },
    }
}

/// Build the full application router on a fresh [`MemoryStore`].
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> Router {
    let config = test_config();
    let tokens = Arc::new(JwtTokenIssuer::new(config.jwt.clone()));
    let state = AppState::new(config, Arc::new(MemoryStore::new()), tokens, None);
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::POST, uri, Some(cookie), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(cookie), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(cookie), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PATCH, uri, Some(cookie), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::DELETE, uri, Some(cookie), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` pair of the first `Set-Cookie` header, ready to send back.
pub fn session_cookie(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register `name` as `<name>@example.com` and return its cookie and user id.
pub async fn register(app: &Router, name: &str) -> (String, String) {
    let body = serde_json::json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "password": "secret123",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response);
    let json = body_json(response).await;
    let id = json["user"]["id"].as_str().unwrap().to_string();
    (cookie, id)
}

/// Create a collection as the cookie's owner and return its id.
pub async fn create_collection(app: &Router, cookie: &str, name: &str) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/collections",
        cookie,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["collection"]["id"].as_i64().unwrap()
}

/// Grant `user_id` the given rights object in `collection_id`.
pub async fn grant(
    app: &Router,
    cookie: &str,
    collection_id: i64,
    user_id: &str,
    rights: serde_json::Value,
) {
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/collections/{collection_id}/users/{user_id}"),
        cookie,
        rights,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

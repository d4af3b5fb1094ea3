#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use quill_api::auth::jwt::{generate_access_token, JwtConfig};
use quill_api::auth::password::hash_password;
use quill_api::config::ServerConfig;
use quill_api::router::build_app_router;
use quill_api::state::AppState;
use quill_core::roles::Role;
use quill_db::models::user::{CreateUser, User};
use quill_db::repositories::UserRepo;
use quill_search::{ElasticIndex, IndexCommand, IndexQueue, SearchConfig};
use sqlx::PgPool;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// The text index points at a closed local port, so free-text lookups fail
/// fast and listings fall back to the relational filters.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        search_candidate_limit: 1000,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        search: SearchConfig {
            url: "http://127.0.0.1:9".to_string(),
            index: "articles-test".to_string(),
            queue_capacity: 64,
            timeout: Duration::from_secs(1),
        },
    }
}

/// Build the full application router plus the receiving end of its index
/// queue, so tests can assert on queued index writes.
pub fn build_test_app_with_queue(pool: PgPool) -> (Router, mpsc::Receiver<IndexCommand>) {
    let config = test_config();
    let search = Arc::new(ElasticIndex::new(&config.search).unwrap());
    let (index_queue, index_rx) = IndexQueue::new(config.search.queue_capacity);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        search,
        index_queue,
    };

    (build_app_router(state, &config), index_rx)
}

/// Build the full application router with all middleware layers.
///
/// The index queue receiver is dropped, so queued writes are discarded.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_queue(pool).0
}

/// Insert a user holding `role` and return it with a valid access token.
pub async fn create_user(pool: &PgPool, email: &str, role: Role) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();
    UserRepo::assign_role(pool, user.id, role).await.unwrap();

    let token =
        generate_access_token(user.id, &[role.as_str().to_string()], &test_config().jwt).unwrap();
    (user, token)
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

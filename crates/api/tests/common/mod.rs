#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use inmo_api::app::build_app;
use inmo_api::auth::password::hash_password;
use inmo_api::auth::session::SessionConfig;
use inmo_api::config::ServerConfig;
use inmo_api::state::AppState;
use inmo_db::models::user::{CreateUser, User};
use inmo_db::repositories::UserRepo;
use inmo_llm::{LlmClient, LlmConfig};
use inmo_storage::{LocalBlobStore, StorageConfig};

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "contraseña-segura";

/// Build a test `ServerConfig` with safe defaults.
///
/// Photos go to `storage_root`; the LLM settings are passed through.
pub fn test_config(storage_root: PathBuf, llm: LlmConfig) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session: SessionConfig {
            secret: "integration-test-secret-with-enough-entropy".to_string(),
            max_age_secs: 3600,
            cookie_name: "inmo_session".to_string(),
            secure: false,
        },
        storage: StorageConfig::Local {
            root: storage_root,
            public_base_url: "/uploads".to_string(),
        },
        llm,
        bootstrap: None,
    }
}

/// A fresh directory for one test's uploads.
pub fn temp_storage_root() -> PathBuf {
    std::env::temp_dir().join(format!("inmo-test-{}", uuid::Uuid::new_v4().simple()))
}

/// Build the full application router (same middleware stack as production)
/// with local photo storage and no LLM configured.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_llm(pool, LlmConfig::default())
}

/// Like [`build_test_app`] but with explicit LLM settings.
pub fn build_test_app_with_llm(pool: PgPool, llm: LlmConfig) -> Router {
    let root = temp_storage_root();
    let config = test_config(root.clone(), llm.clone());

    let state = AppState {
        pool,
        config: Arc::new(config),
        blob_store: Arc::new(LocalBlobStore::new(root, "/uploads".to_string())),
        llm: LlmClient::new(llm).expect("LLM client should build"),
    };

    build_app(state)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly in the database.
pub async fn create_user(pool: &PgPool, name: &str, email: &str, rol: &str) -> User {
    let input = CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        rol: rol.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the `name=value` cookie pair to send back.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    session_cookie(&response).expect("login must set the session cookie")
}

/// Create a user with the given role and log them in.
pub async fn login_as(pool: &PgPool, app: Router, rol: &str, email: &str) -> (User, String) {
    let user = create_user(pool, &format!("{rol} de prueba"), email, rol).await;
    let cookie = login(app, email, TEST_PASSWORD).await;
    (user, cookie)
}

/// Convenience: a logged-in gestor.
pub async fn login_gestor(pool: &PgPool, app: Router) -> (User, String) {
    login_as(pool, app, "gestor", "gestor@estudio.es").await
}

/// The `name=value` part of the response's `Set-Cookie` header.
pub fn session_cookie<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(|pair| pair.trim().to_string())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send_json(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send_json(app, Method::GET, uri, None, Some(cookie)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send_json(app, Method::POST, uri, Some(body), Some(cookie)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send_json(app, Method::PUT, uri, Some(body), Some(cookie)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send_json(app, Method::PATCH, uri, Some(body), Some(cookie)).await
}

pub async fn delete_auth(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send_json(app, Method::DELETE, uri, None, Some(cookie)).await
}

/// POST a multipart body with a single `file` field.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    content_type: &str,
    data: &[u8],
    cookie: &str,
) -> Response<Body> {
    const BOUNDARY: &str = "inmo-test-boundary";
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"photo\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, cookie)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request should build");
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// A minimal valid PNG signature followed by an IHDR length, enough for
/// format sniffing.
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&[0u8; 64]);
    data
}

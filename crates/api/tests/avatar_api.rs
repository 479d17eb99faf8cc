//! HTTP-level integration tests for the avatar chat.
//!
//! A throwaway axum server stands in for the chat-completion endpoint.

mod common;

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::{body_json, get, post_json};
use inmo_llm::LlmConfig;
use sqlx::PgPool;

/// Spawn a fake `/chat/completions` endpoint.
///
/// Returns its base URL and the last request body it received.
async fn spawn_stub(
    status: StatusCode,
    reply: serde_json::Value,
) -> (String, Arc<Mutex<Option<serde_json::Value>>>) {
    let seen = Arc::new(Mutex::new(None));
    let seen_in_handler = Arc::clone(&seen);

    let app = Router::new().route(
        "/chat/completions",
        post(move |Json(body): Json<serde_json::Value>| {
            let seen = Arc::clone(&seen_in_handler);
            let reply = reply.clone();
            async move {
                *seen.lock().unwrap() = Some(body);
                (status, Json(reply))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

fn llm_config(api_url: String) -> LlmConfig {
    LlmConfig {
        api_url,
        api_key: Some("test-key".into()),
        timeout_secs: 5,
        ..LlmConfig::default()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_moods_are_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/avatar/moods").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let moods: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["mood"].as_str().unwrap())
        .collect();
    assert_eq!(
        moods,
        vec!["neutral", "happy", "sad", "angry", "excited", "calm"]
    );
    assert!(json["data"][0]["label"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_chat_forwards_conversation(pool: PgPool) {
    let (url, seen) = spawn_stub(
        StatusCode::OK,
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "  ¡Hola! ¿Qué tal?  " } }]
        }),
    )
    .await;
    let app = common::build_test_app_with_llm(pool, llm_config(url));

    let body = serde_json::json!({
        "message": "  Hola  ",
        "mood": "happy",
        "history": [
            { "role": "user", "content": "Buenos días" },
            { "role": "assistant", "content": "Buenos días a ti" },
        ],
    });
    let response = post_json(app, "/api/v1/avatar/chat", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["reply"], "¡Hola! ¿Qué tal?");
    assert_eq!(json["data"]["mood"], "happy");

    let sent = seen.lock().unwrap().clone().expect("stub should be called");
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "Buenos días");
    assert_eq!(messages[3]["role"], "user");
    assert_eq!(messages[3]["content"], "Hola");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_chat_validation(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [
        serde_json::json!({ "message": "   " }),
        serde_json::json!({ "message": "x".repeat(2001) }),
        serde_json::json!({ "message": "hola", "history": [{ "role": "system", "content": "..." }] }),
    ] {
        let response = post_json(app.clone(), "/api/v1/avatar/chat", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // Unknown mood fails deserialization.
    let body = serde_json::json!({ "message": "hola", "mood": "furioso" });
    let response = post_json(app, "/api/v1/avatar/chat", body).await;
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_history_turn_is_not_forwarded(pool: PgPool) {
    let (url, seen) = spawn_stub(
        StatusCode::OK,
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hola" } }]
        }),
    )
    .await;
    let app = common::build_test_app_with_llm(pool, llm_config(url));

    let body = serde_json::json!({
        "message": "hola",
        "history": [{ "role": "user", "content": "x".repeat(2001) }],
    });
    let response = post_json(app, "/api/v1/avatar/chat", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("history[0]"));
    assert!(seen.lock().unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_chat_without_llm_returns_503(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "message": "hola" });
    let response = post_json(app, "/api/v1/avatar/chat", body).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_chat_upstream_failure_returns_502(pool: PgPool) {
    let (url, _seen) = spawn_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "error": { "message": "boom" } }),
    )
    .await;
    let app = common::build_test_app_with_llm(pool, llm_config(url));

    let body = serde_json::json!({ "message": "hola" });
    let response = post_json(app, "/api/v1/avatar/chat", body).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
}

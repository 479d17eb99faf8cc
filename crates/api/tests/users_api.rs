//! HTTP-level integration tests for `/users` (gestor-only account management).

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, login, login_gestor, post_json, post_json_auth,
    put_json_auth,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_list_users(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;

    let body = serde_json::json!({
        "name": "Ana Ruiz",
        "email": "Ana@Estudio.es",
        "password": "clave-de-ana",
        "rol": "arquitecto",
    });
    let response = post_json_auth(app.clone(), "/api/v1/users", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "ana@estudio.es");
    assert_eq!(json["data"]["rol"], "arquitecto");
    assert_eq!(json["data"]["is_active"], true);
    assert!(json["data"].get("password_hash").is_none());

    // The new account can log in.
    login(app.clone(), "ana@estudio.es", "clave-de-ana").await;

    let response = get_auth(app, "/api/v1/users", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana Ruiz", "gestor de prueba"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_user_validation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;

    let cases = [
        serde_json::json!({ "name": " ", "email": "a@b.es", "password": "12345678", "rol": "gestor" }),
        serde_json::json!({ "name": "A", "email": "no-es-email", "password": "12345678", "rol": "gestor" }),
        serde_json::json!({ "name": "A", "email": "a@b.es", "password": "1234567", "rol": "gestor" }),
        serde_json::json!({ "name": "A", "email": "a@b.es", "password": "12345678", "rol": "admin" }),
    ];
    for body in cases {
        let response = post_json_auth(app.clone(), "/api/v1/users", body.clone(), &cookie).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;

    let body = serde_json::json!({
        "name": "Otro",
        "email": "GESTOR@estudio.es",
        "password": "12345678",
        "rol": "gestor",
    });
    let response = post_json_auth(app, "/api/v1/users", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let other = common::create_user(&pool, "Ana", "ana@estudio.es", "arquitecto").await;

    let body = serde_json::json!({ "name": "Ana María", "rol": "gestor" });
    let uri = format!("/api/v1/users/{}", other.id);
    let response = put_json_auth(app.clone(), &uri, body, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Ana María");
    assert_eq!(json["data"]["rol"], "gestor");
    assert_eq!(json["data"]["email"], "ana@estudio.es");

    let response = put_json_auth(
        app,
        "/api/v1/users/999999",
        serde_json::json!({ "name": "X" }),
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_linked_arquitecto_cannot_become_gestor(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let luis = common::create_user(&pool, "Luis", "luis@estudio.es", "arquitecto").await;

    let body = serde_json::json!({
        "name": "Luis",
        "email": "luis@estudio.es",
        "user_id": luis.id,
    });
    let response = post_json_auth(app.clone(), "/api/v1/architects", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("/api/v1/users/{}", luis.id);
    let body = serde_json::json!({ "rol": "gestor" });
    let response = put_json_auth(app.clone(), &uri, body, &cookie).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = get_auth(app, &uri, &cookie).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["rol"], "arquitecto");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_gestor_cannot_change_own_role(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (gestor, cookie) = login_gestor(&pool, app.clone()).await;

    let uri = format!("/api/v1/users/{}", gestor.id);
    let body = serde_json::json!({ "rol": "arquitecto" });
    let response = put_json_auth(app.clone(), &uri, body, &cookie).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Re-sending the current role and editing the name is fine.
    let body = serde_json::json!({ "rol": "gestor", "name": "Marta G." });
    let response = put_json_auth(app.clone(), &uri, body, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The session still carries management rights.
    let response = get_auth(app, "/api/v1/users", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let other = common::create_user(&pool, "Ana", "ana@estudio.es", "arquitecto").await;

    let response = delete_auth(app.clone(), &format!("/api/v1/users/{}", other.id), &cookie).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/api/v1/users/{}", other.id), &cookie).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_active"], false);

    // A gestor cannot deactivate themselves.
    let response = delete_auth(app.clone(), &format!("/api/v1/users/{}", gestor.id), &cookie).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app, "/api/v1/users/999999", &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let other = common::create_user(&pool, "Ana", "ana@estudio.es", "arquitecto").await;

    let uri = format!("/api/v1/users/{}/reset-password", other.id);
    let response = post_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "new_password": "nueva-clave-ana" }),
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "email": "ana@estudio.es", "password": "nueva-clave-ana" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

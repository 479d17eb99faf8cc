//! HTTP-level integration tests for `/assignments`: CRUD, status
//! transitions, and per-role visibility.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, login_as, login_gestor, patch_json_auth, post_json_auth,
    put_json_auth,
};
use inmo_core::types::DbId;
use inmo_db::models::architect::CreateArchitect;
use inmo_db::models::client::CreateClient;
use inmo_db::repositories::{ArchitectRepo, ClientRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_client(pool: &PgPool, name: &str) -> DbId {
    ClientRepo::create(
        pool,
        &CreateClient {
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_architect(pool: &PgPool, name: &str, email: &str, user_id: Option<DbId>) -> DbId {
    ArchitectRepo::create(
        pool,
        &CreateArchitect {
            name: name.into(),
            email: email.into(),
            phone: None,
            license_number: None,
            specialty: None,
            user_id,
        },
    )
    .await
    .unwrap()
    .id
}

async fn create_assignment(
    app: axum::Router,
    cookie: &str,
    client_id: DbId,
    architect_id: DbId,
) -> serde_json::Value {
    let body = serde_json::json!({
        "client_id": client_id,
        "architect_id": architect_id,
        "property_address": "Calle Luna 3, Madrid",
        "due_date": "2026-12-01",
    });
    let response = post_json_auth(app, "/api/v1/assignments", body, cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn set_status(
    app: axum::Router,
    cookie: &str,
    id: &serde_json::Value,
    status: &str,
) -> StatusCode {
    let uri = format!("/api/v1/assignments/{id}/status");
    patch_json_auth(app, &uri, serde_json::json!({ "status": status }), cookie)
        .await
        .status()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_assignment(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let client_id = seed_client(&pool, "Alba").await;
    let architect_id = seed_architect(&pool, "Luis", "luis@estudio.es", None).await;

    let created = create_assignment(app, &cookie, client_id, architect_id).await;
    assert_eq!(created["status"], "pendiente");
    assert_eq!(created["client_name"], "Alba");
    assert_eq!(created["architect_name"], "Luis");
    assert_eq!(created["due_date"], "2026-12-01");
    assert_eq!(created["created_by"], gestor.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_assignment_validation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let client_id = seed_client(&pool, "Alba").await;
    let architect_id = seed_architect(&pool, "Luis", "luis@estudio.es", None).await;

    for body in [
        serde_json::json!({ "client_id": 999999, "architect_id": architect_id, "property_address": "X" }),
        serde_json::json!({ "client_id": client_id, "architect_id": 999999, "property_address": "X" }),
        serde_json::json!({ "client_id": client_id, "architect_id": architect_id, "property_address": "  " }),
    ] {
        let response =
            post_json_auth(app.clone(), "/api/v1/assignments", body.clone(), &cookie).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_assignment(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let client_id = seed_client(&pool, "Alba").await;
    let architect_id = seed_architect(&pool, "Luis", "luis@estudio.es", None).await;
    let other_architect = seed_architect(&pool, "Eva", "eva@estudio.es", None).await;
    let created = create_assignment(app.clone(), &cookie, client_id, architect_id).await;

    let uri = format!("/api/v1/assignments/{}", created["id"]);
    let body = serde_json::json!({ "architect_id": other_architect, "notes": "Llaves en portería" });
    let response = put_json_auth(app.clone(), &uri, body, &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["architect_name"], "Eva");
    assert_eq!(json["data"]["notes"], "Llaves en portería");
    assert_eq!(json["data"]["status"], "pendiente");

    let response = delete_auth(app.clone(), &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(app.clone(), &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete_auth(app, &uri, &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let client_id = seed_client(&pool, "Alba").await;
    let architect_id = seed_architect(&pool, "Luis", "luis@estudio.es", None).await;
    let created = create_assignment(app.clone(), &cookie, client_id, architect_id).await;
    let id = &created["id"];

    // pendiente -> completada skips a step.
    assert_eq!(
        set_status(app.clone(), &cookie, id, "completada").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        set_status(app.clone(), &cookie, id, "en_progreso").await,
        StatusCode::OK
    );
    assert_eq!(
        set_status(app.clone(), &cookie, id, "completada").await,
        StatusCode::OK
    );
    // completada is terminal.
    assert_eq!(
        set_status(app.clone(), &cookie, id, "pendiente").await,
        StatusCode::BAD_REQUEST
    );
    // Unknown status value.
    assert_eq!(
        set_status(app, &cookie, id, "archivada").await,
        StatusCode::BAD_REQUEST
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelled_assignment_can_reopen(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let client_id = seed_client(&pool, "Alba").await;
    let architect_id = seed_architect(&pool, "Luis", "luis@estudio.es", None).await;
    let created = create_assignment(app.clone(), &cookie, client_id, architect_id).await;
    let id = &created["id"];

    assert_eq!(
        set_status(app.clone(), &cookie, id, "cancelada").await,
        StatusCode::OK
    );
    assert_eq!(
        set_status(app.clone(), &cookie, id, "pendiente").await,
        StatusCode::OK
    );

    let response = get_auth(app, &format!("/api/v1/assignments/{id}"), &cookie).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pendiente");
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_arquitecto_sees_only_linked_assignments(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let (arq_user, arq_cookie) =
        login_as(&pool, app.clone(), "arquitecto", "luis@estudio.es").await;

    let client_id = seed_client(&pool, "Alba").await;
    let mine = seed_architect(&pool, "Luis", "luis@estudio.es", Some(arq_user.id)).await;
    let other = seed_architect(&pool, "Eva", "eva@estudio.es", None).await;
    let own = create_assignment(app.clone(), &cookie, client_id, mine).await;
    let foreign = create_assignment(app.clone(), &cookie, client_id, other).await;

    // Gestor sees both.
    let response = get_auth(app.clone(), "/api/v1/assignments", &cookie).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    // Arquitecto sees only their own, even when asking for another architect.
    let response = get_auth(app.clone(), "/api/v1/assignments", &arq_cookie).await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], own["id"]);

    let uri = format!("/api/v1/assignments?architect_id={other}");
    let response = get_auth(app.clone(), &uri, &arq_cookie).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // A foreign assignment looks missing.
    let uri = format!("/api/v1/assignments/{}", foreign["id"]);
    let response = get_auth(app.clone(), &uri, &arq_cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        set_status(app.clone(), &arq_cookie, &foreign["id"], "en_progreso").await,
        StatusCode::NOT_FOUND
    );

    // The linked architect may move their own assignment...
    assert_eq!(
        set_status(app.clone(), &arq_cookie, &own["id"], "en_progreso").await,
        StatusCode::OK
    );

    // ...but may not edit or delete it.
    let uri = format!("/api/v1/assignments/{}", own["id"]);
    let response = put_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "notes": "x" }),
        &arq_cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = delete_auth(app, &uri, &arq_cookie).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlinked_arquitecto_sees_nothing(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let (_arq, arq_cookie) = login_as(&pool, app.clone(), "arquitecto", "luis@estudio.es").await;

    let client_id = seed_client(&pool, "Alba").await;
    let architect_id = seed_architect(&pool, "Eva", "eva@estudio.es", None).await;
    create_assignment(app.clone(), &cookie, client_id, architect_id).await;

    let response = get_auth(app, "/api/v1/assignments", &arq_cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_gestor, cookie) = login_gestor(&pool, app.clone()).await;
    let alba = seed_client(&pool, "Alba").await;
    let bruno = seed_client(&pool, "Bruno").await;
    let architect_id = seed_architect(&pool, "Luis", "luis@estudio.es", None).await;

    let first = create_assignment(app.clone(), &cookie, alba, architect_id).await;
    create_assignment(app.clone(), &cookie, bruno, architect_id).await;
    set_status(app.clone(), &cookie, &first["id"], "en_progreso").await;

    let response = get_auth(app.clone(), "/api/v1/assignments?status=en_progreso", &cookie).await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], first["id"]);

    let uri = format!("/api/v1/assignments?client_id={bruno}");
    let response = get_auth(app.clone(), &uri, &cookie).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["client_name"], "Bruno");

    let response = get_auth(app, "/api/v1/assignments?status=archivada", &cookie).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

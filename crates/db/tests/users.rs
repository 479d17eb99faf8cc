//! Integration tests for the user repository: login bookkeeping and
//! soft deactivation.

use chrono::{Duration, Utc};
use inmo_db::models::user::{CreateUser, UpdateUser};
use inmo_db::repositories::UserRepo;
use sqlx::PgPool;

fn new_user(email: &str, rol: &str) -> CreateUser {
    CreateUser {
        name: "Prueba".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        rol: rol.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ana@estudio.es", "gestor"))
        .await
        .unwrap();
    assert!(user.is_active);
    assert_eq!(user.failed_login_count, 0);

    let found = UserRepo::find_by_email(&pool, "ana@estudio.es")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_and_bad_role_are_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("ana@estudio.es", "gestor"))
        .await
        .unwrap();

    let err = UserRepo::create(&pool, &new_user("ana@estudio.es", "gestor"))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_users_email")
    );

    let err = UserRepo::create(&pool, &new_user("otro@estudio.es", "admin"))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("ck_users_rol")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_login_bookkeeping(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ana@estudio.es", "arquitecto"))
        .await
        .unwrap();

    assert_eq!(UserRepo::increment_failed_login(&pool, user.id).await.unwrap(), 1);
    assert_eq!(UserRepo::increment_failed_login(&pool, user.id).await.unwrap(), 2);

    let until = Utc::now() + Duration::minutes(15);
    UserRepo::lock_account(&pool, user.id, until).await.unwrap();
    let locked = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(locked.locked_until.is_some());
    assert_eq!(locked.failed_login_count, 0);

    // Counting restarts from zero after a lock.
    assert_eq!(UserRepo::increment_failed_login(&pool, user.id).await.unwrap(), 1);

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let reset = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reset.failed_login_count, 0);
    assert!(reset.locked_until.is_none());
    assert!(reset.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_is_idempotent(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ana@estudio.es", "arquitecto"))
        .await
        .unwrap();

    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    assert!(!UserRepo::deactivate(&pool, user.id).await.unwrap());

    let reactivated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            is_active: Some(true),
            ..UpdateUser::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(reactivated.is_active);
}

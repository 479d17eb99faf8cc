//! Handlers for the `/users` resource (login account management).
//!
//! All handlers require the `gestor` role via [`RequireGestor`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inmo_core::contact::{normalize_email, validate_email, validate_name};
use inmo_core::error::CoreError;
use inmo_core::roles::{is_gestor, validate_role};
use inmo_core::types::DbId;
use inmo_db::models::user::{CreateUser, UpdateUser, UserResponse};
use inmo_db::repositories::{ArchitectRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireGestor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub rol: String,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rol: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
///
/// Create a login account. Returns the safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let email = normalize_email(&input.email);
    validate_name(&input.name)?;
    validate_email(&email)?;
    validate_role(&input.rol)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        name: input.name.trim().to_string(),
        email,
        password_hash: hashed,
        rol: input.rol,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, rol = %user.rol, created_by = gestor.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/users
///
/// List all users ordered by name.
pub async fn list_users(
    State(state): State<AppState>,
    RequireGestor(_gestor): RequireGestor,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireGestor(_gestor): RequireGestor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/users/{id}
///
/// Update a user's profile fields (not password).
///
/// A gestor cannot deactivate or demote themselves, and an account linked to
/// an architect profile cannot be promoted to gestor.
pub async fn update_user(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    let email = input.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        validate_email(email)?;
    }
    if let Some(rol) = &input.rol {
        validate_role(rol)?;
    }
    if id == gestor.user_id && input.is_active == Some(false) {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }
    if let Some(rol) = input.rol.as_deref() {
        if id == gestor.user_id && !is_gestor(rol) {
            return Err(AppError::BadRequest(
                "You cannot change your own role".into(),
            ));
        }
        if is_gestor(rol) {
            if let Some(architect) = ArchitectRepo::find_by_user_id(&state.pool, id).await? {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "user {id} is linked to architect {} and must keep rol 'arquitecto'",
                    architect.id
                ))));
            }
        }
    }

    let update_dto = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()),
        email,
        rol: input.rol,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = user.id, updated_by = gestor.user_id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Soft-deactivate a user (sets `is_active = false`). Returns 204 No Content.
/// Deactivating an already inactive user is a no-op.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == gestor.user_id {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }

    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if UserRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = id, deactivated_by = gestor.user_id, "User deactivated");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/{id}/reset-password
///
/// Gestor-initiated password reset for a user.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let updated = UserRepo::update_password(&state.pool, id, &hashed).await?;
    if updated {
        tracing::info!(user_id = id, reset_by = gestor.user_id, "Password reset");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

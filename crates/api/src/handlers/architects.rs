//! Handlers for the `/architects` resource.
//!
//! Same surface as `/clients`, plus the optional link to an `arquitecto`
//! login account and the per-architect assignment list.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inmo_core::contact::{
    normalize_email, validate_email, validate_name, validate_optional_phone,
};
use inmo_core::error::CoreError;
use inmo_core::roles::ROLE_ARQUITECTO;
use inmo_core::search::ilike_pattern;
use inmo_core::types::DbId;
use inmo_db::models::architect::{Architect, CreateArchitect, UpdateArchitect};
use inmo_db::models::assignment::Assignment;
use inmo_db::repositories::{ArchitectRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::assignments::{list_scoped, ScopedFilter};
use crate::handlers::photos::{discard_blob, read_photo_field, store_photo};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireGestor;
use crate::query::{AssignmentListParams, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Blob-store prefix for architect photos.
const PHOTO_ENTITY: &str = "architects";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Architect",
        id,
    })
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /architects/{id}`.
///
/// `user_id` links a login account; `unlink_user: true` removes the link.
#[derive(Debug, Deserialize)]
pub struct UpdateArchitectRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub user_id: Option<DbId>,
    #[serde(default)]
    pub unlink_user: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A linked account must exist and have the `arquitecto` role.
async fn validate_linked_user(state: &AppState, user_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "user_id {user_id} does not exist"
            )))
        })?;
    if user.rol != ROLE_ARQUITECTO {
        return Err(AppError::Core(CoreError::Validation(format!(
            "user_id {user_id} must have rol '{ROLE_ARQUITECTO}'"
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/architects?search=&limit=&offset=
pub async fn list_architects(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Architect>>>> {
    let pattern = ilike_pattern(params.search.as_deref());
    let architects =
        ArchitectRepo::list(&state.pool, pattern.as_deref(), params.limit(), params.offset())
            .await?;
    Ok(Json(DataResponse { data: architects }))
}

/// GET /api/v1/architects/{id}
pub async fn get_architect(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Architect>>> {
    let architect = ArchitectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: architect }))
}

/// POST /api/v1/architects
pub async fn create_architect(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Json(mut input): Json<CreateArchitect>,
) -> AppResult<(StatusCode, Json<DataResponse<Architect>>)> {
    input.email = normalize_email(&input.email);
    validate_name(&input.name)?;
    validate_email(&input.email)?;
    validate_optional_phone(input.phone.as_deref())?;
    if let Some(user_id) = input.user_id {
        validate_linked_user(&state, user_id).await?;
    }
    input.name = input.name.trim().to_string();

    let architect = ArchitectRepo::create(&state.pool, &input).await?;
    tracing::info!(
        architect_id = architect.id,
        linked_user = ?architect.user_id,
        user_id = gestor.user_id,
        "Architect created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: architect })))
}

/// PUT /api/v1/architects/{id}
///
/// Partial update: omitted fields keep their current value and a blank
/// `phone`, `license_number` or `specialty` is cleared.
pub async fn update_architect(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArchitectRequest>,
) -> AppResult<Json<DataResponse<Architect>>> {
    if input.unlink_user && input.user_id.is_some() {
        return Err(AppError::BadRequest(
            "user_id and unlink_user cannot be combined".into(),
        ));
    }
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    let email = input.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        validate_email(email)?;
    }
    validate_optional_phone(input.phone.as_deref())?;
    if let Some(user_id) = input.user_id {
        validate_linked_user(&state, user_id).await?;
    }

    let update_dto = UpdateArchitect {
        name: input.name.map(|n| n.trim().to_string()),
        email,
        phone: input.phone,
        license_number: input.license_number,
        specialty: input.specialty,
        user_id: input.user_id,
    };

    let mut architect = ArchitectRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or_else(|| not_found(id))?;

    if input.unlink_user && architect.user_id.is_some() {
        architect = ArchitectRepo::set_user(&state.pool, id, None)
            .await?
            .ok_or_else(|| not_found(id))?;
    }

    tracing::info!(
        architect_id = id,
        linked_user = ?architect.user_id,
        user_id = gestor.user_id,
        "Architect updated"
    );
    Ok(Json(DataResponse { data: architect }))
}

/// DELETE /api/v1/architects/{id}
///
/// Fails with 409 while assignments reference the architect. The photo blob
/// is removed best effort.
pub async fn delete_architect(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let architect = ArchitectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !ArchitectRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    discard_blob(&state, architect.photo_key.as_deref()).await;
    tracing::info!(architect_id = id, user_id = gestor.user_id, "Architect deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/architects/{id}/assignments?status=&limit=&offset=
///
/// A gestor may list any architect; an arquitecto only their own profile.
pub async fn list_architect_assignments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<AssignmentListParams>,
) -> AppResult<Json<DataResponse<Vec<Assignment>>>> {
    ArchitectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let filter = ScopedFilter::Architect(id);
    let assignments = list_scoped(&state, &user, params, filter)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse { data: assignments }))
}

/// POST /api/v1/architects/{id}/photo
///
/// Multipart upload with a `file` field (JPEG, PNG or WebP, at most 5 MiB).
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Architect>>> {
    if ArchitectRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let upload = read_photo_field(multipart).await?;
    let stored = store_photo(&state, PHOTO_ENTITY, id, upload).await?;

    let result = ArchitectRepo::set_photo(
        &state.pool,
        id,
        Some(stored.url.as_str()),
        Some(stored.key.as_str()),
    )
    .await;
    let change = match result {
        Ok(Some(change)) => change,
        Ok(None) => {
            discard_blob(&state, Some(stored.key.as_str())).await;
            return Err(not_found(id));
        }
        Err(e) => {
            discard_blob(&state, Some(stored.key.as_str())).await;
            return Err(e.into());
        }
    };

    discard_blob(&state, change.previous_photo_key.as_deref()).await;
    tracing::info!(
        architect_id = id,
        user_id = gestor.user_id,
        key = %stored.key,
        "Architect photo updated"
    );

    Ok(Json(DataResponse { data: change.architect }))
}

/// DELETE /api/v1/architects/{id}/photo
pub async fn delete_photo(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Architect>>> {
    let change = ArchitectRepo::set_photo(&state.pool, id, None, None)
        .await?
        .ok_or_else(|| not_found(id))?;

    discard_blob(&state, change.previous_photo_key.as_deref()).await;
    tracing::info!(architect_id = id, user_id = gestor.user_id, "Architect photo removed");

    Ok(Json(DataResponse { data: change.architect }))
}

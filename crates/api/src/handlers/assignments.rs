//! Handlers for the `/assignments` resource.
//!
//! A gestor sees and edits everything. An arquitecto only sees the
//! assignments of the architect profile linked to their account and may
//! only change their status; anything else answers 404 so the existence of
//! other assignments is not leaked.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inmo_core::assignment::{validate_property_address, validate_status, validate_transition};
use inmo_core::error::CoreError;
use inmo_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use inmo_core::types::DbId;
use inmo_db::models::assignment::{
    Assignment, AssignmentFilter, CreateAssignment, UpdateAssignment,
};
use inmo_db::repositories::{ArchitectRepo, AssignmentRepo, ClientRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireGestor;
use crate::query::AssignmentListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Assignment",
        id,
    })
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PATCH /assignments/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Visibility helpers
// ---------------------------------------------------------------------------

/// Which assignments a list request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopedFilter {
    /// `GET /assignments`: everything the caller may see.
    All,
    /// `GET /architects/{id}/assignments`: one architect's assignments.
    Architect(DbId),
}

/// Architect profile linked to the caller, if any.
async fn linked_architect_id(state: &AppState, user: &AuthUser) -> AppResult<Option<DbId>> {
    Ok(ArchitectRepo::find_by_user_id(&state.pool, user.user_id)
        .await?
        .map(|a| a.id))
}

/// Whether `user` may see `assignment`.
async fn can_view(state: &AppState, user: &AuthUser, assignment: &Assignment) -> AppResult<bool> {
    if user.is_gestor() {
        return Ok(true);
    }
    Ok(linked_architect_id(state, user).await? == Some(assignment.architect_id))
}

/// Load an assignment the caller may see, or 404.
async fn find_visible(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Assignment> {
    let assignment = AssignmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !can_view(state, user, &assignment).await? {
        return Err(not_found(id));
    }
    Ok(assignment)
}

/// List assignments restricted to what `user` may see.
///
/// Returns `None` when `scope` names an architect the caller may not list.
pub async fn list_scoped(
    state: &AppState,
    user: &AuthUser,
    params: AssignmentListParams,
    scope: ScopedFilter,
) -> AppResult<Option<Vec<Assignment>>> {
    let status = params.status.filter(|s| !s.trim().is_empty());
    if let Some(status) = &status {
        validate_status(status)?;
    }

    let mut architect_id = match scope {
        ScopedFilter::All => params.architect_id,
        ScopedFilter::Architect(id) => Some(id),
    };

    if !user.is_gestor() {
        let Some(linked) = linked_architect_id(state, user).await? else {
            return Ok(match scope {
                ScopedFilter::All => Some(Vec::new()),
                ScopedFilter::Architect(_) => None,
            });
        };
        match architect_id {
            Some(requested) if requested != linked => {
                return Ok(match scope {
                    ScopedFilter::All => Some(Vec::new()),
                    ScopedFilter::Architect(_) => None,
                });
            }
            _ => architect_id = Some(linked),
        }
    }

    let filter = AssignmentFilter {
        status,
        client_id: params.client_id,
        architect_id,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        offset: clamp_offset(params.offset),
    };
    Ok(Some(AssignmentRepo::list(&state.pool, &filter).await?))
}

/// Referenced client and architect must exist (400 otherwise).
async fn validate_references(
    state: &AppState,
    client_id: Option<DbId>,
    architect_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(client_id) = client_id {
        if ClientRepo::find_by_id(&state.pool, client_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "client_id {client_id} does not exist"
            ))));
        }
    }
    if let Some(architect_id) = architect_id {
        if ArchitectRepo::find_by_id(&state.pool, architect_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(format!(
                "architect_id {architect_id} does not exist"
            ))));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/assignments?status=&client_id=&architect_id=&limit=&offset=
pub async fn list_assignments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<AssignmentListParams>,
) -> AppResult<Json<DataResponse<Vec<Assignment>>>> {
    let assignments = list_scoped(&state, &user, params, ScopedFilter::All)
        .await?
        .unwrap_or_default();
    Ok(Json(DataResponse { data: assignments }))
}

/// GET /api/v1/assignments/{id}
pub async fn get_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    let assignment = find_visible(&state, &user, id).await?;
    Ok(Json(DataResponse { data: assignment }))
}

/// POST /api/v1/assignments
///
/// New assignments start as `pendiente`; `created_by` is the caller.
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Json(mut input): Json<CreateAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<Assignment>>)> {
    validate_property_address(&input.property_address)?;
    validate_references(&state, Some(input.client_id), Some(input.architect_id)).await?;
    input.property_address = input.property_address.trim().to_string();

    let assignment = AssignmentRepo::create(&state.pool, &input, Some(gestor.user_id)).await?;
    tracing::info!(
        assignment_id = assignment.id,
        client_id = assignment.client_id,
        architect_id = assignment.architect_id,
        user_id = gestor.user_id,
        "Assignment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// PUT /api/v1/assignments/{id}
///
/// Edits everything except the status.
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAssignment>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    if let Some(address) = &input.property_address {
        validate_property_address(address)?;
    }
    validate_references(&state, input.client_id, input.architect_id).await?;
    input.property_address = input.property_address.map(|a| a.trim().to_string());

    let assignment = AssignmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(assignment_id = id, user_id = gestor.user_id, "Assignment updated");

    Ok(Json(DataResponse { data: assignment }))
}

/// PATCH /api/v1/assignments/{id}/status
///
/// Gestor or the linked architect. The move must be an allowed transition
/// from the current status; a concurrent change answers 409.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    let current = find_visible(&state, &user, id).await?;
    validate_transition(&current.status, &input.status)?;

    let updated = AssignmentRepo::update_status(&state.pool, id, &current.status, &input.status)
        .await?;
    let Some(assignment) = updated else {
        return match AssignmentRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(
                "Assignment status changed concurrently; reload and retry".into(),
            ))),
            None => Err(not_found(id)),
        };
    };

    tracing::info!(
        assignment_id = id,
        from = %current.status,
        to = %assignment.status,
        user_id = user.user_id,
        "Assignment status changed"
    );
    Ok(Json(DataResponse { data: assignment }))
}

/// DELETE /api/v1/assignments/{id}
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AssignmentRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(assignment_id = id, user_id = gestor.user_id, "Assignment deleted");
    Ok(StatusCode::NO_CONTENT)
}

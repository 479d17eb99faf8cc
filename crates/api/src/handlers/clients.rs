//! Handlers for the `/clients` resource.
//!
//! Reads are open to any authenticated user; writes require the `gestor` role.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inmo_core::contact::{
    normalize_email, validate_name, validate_optional_email, validate_optional_phone,
};
use inmo_core::error::CoreError;
use inmo_core::search::ilike_pattern;
use inmo_core::types::DbId;
use inmo_db::models::client::{Client, CreateClient, UpdateClient};
use inmo_db::repositories::ClientRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::photos::{discard_blob, read_photo_field, store_photo};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireGestor;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Blob-store prefix for client photos.
const PHOTO_ENTITY: &str = "clients";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Client",
        id,
    })
}

/// Shared field validation for create and update.
fn validate_fields(
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        validate_name(name)?;
    }
    validate_optional_email(email)?;
    validate_optional_phone(phone)
}

/// GET /api/v1/clients?search=&limit=&offset=
pub async fn list_clients(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let pattern = ilike_pattern(params.search.as_deref());
    let clients =
        ClientRepo::list(&state.pool, pattern.as_deref(), params.limit(), params.offset()).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: client }))
}

/// POST /api/v1/clients
pub async fn create_client(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Json(mut input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    validate_fields(
        Some(input.name.as_str()),
        input.email.as_deref(),
        input.phone.as_deref(),
    )?;
    input.name = input.name.trim().to_string();
    input.email = input.email.as_deref().map(normalize_email);

    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, user_id = gestor.user_id, "Client created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// PUT /api/v1/clients/{id}
///
/// Partial update: omitted fields keep their current value and blank
/// optional fields are cleared.
pub async fn update_client(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    validate_fields(
        input.name.as_deref(),
        input.email.as_deref(),
        input.phone.as_deref(),
    )?;
    input.name = input.name.map(|n| n.trim().to_string());
    input.email = input.email.as_deref().map(normalize_email);

    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(client_id = id, user_id = gestor.user_id, "Client updated");

    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
///
/// Fails with 409 while assignments reference the client. The photo blob is
/// removed best effort.
pub async fn delete_client(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !ClientRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    discard_blob(&state, client.photo_key.as_deref()).await;
    tracing::info!(client_id = id, user_id = gestor.user_id, "Client deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/clients/{id}/photo
///
/// Multipart upload with a `file` field (JPEG, PNG or WebP, at most 5 MiB).
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Client>>> {
    if ClientRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let upload = read_photo_field(multipart).await?;
    let stored = store_photo(&state, PHOTO_ENTITY, id, upload).await?;

    let result = ClientRepo::set_photo(
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
        client_id = id,
        user_id = gestor.user_id,
        key = %stored.key,
        "Client photo updated"
    );

    Ok(Json(DataResponse { data: change.client }))
}

/// DELETE /api/v1/clients/{id}/photo
pub async fn delete_photo(
    State(state): State<AppState>,
    RequireGestor(gestor): RequireGestor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let change = ClientRepo::set_photo(&state.pool, id, None, None)
        .await?
        .ok_or_else(|| not_found(id))?;

    discard_blob(&state, change.previous_photo_key.as_deref()).await;
    tracing::info!(client_id = id, user_id = gestor.user_id, "Client photo removed");

    Ok(Json(DataResponse { data: change.client }))
}

//! Shared plumbing for the entity photo endpoints.
//!
//! Clients and architects both accept a multipart upload with a single
//! `file` field. The bytes are validated, written to the blob store under
//! `{entity}/{id}/{uuid}.{ext}`, and the previous blob (if any) is removed
//! best effort once the row points at the new one.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use inmo_core::photo::{photo_key, validate_photo, MAX_PHOTO_BYTES};
use inmo_core::types::DbId;
use inmo_storage::StoredObject;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Raw `file` field of a photo upload.
#[derive(Debug)]
pub struct PhotoUpload {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Read the `file` field from a multipart body. Other fields are ignored.
pub async fn read_photo_field(mut multipart: Multipart) -> AppResult<PhotoUpload> {
    let mut upload: Option<PhotoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some(PhotoUpload {
            content_type,
            data: data.to_vec(),
        });
    }

    upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))
}

/// Validate an upload and write it to the blob store.
pub async fn store_photo(
    state: &AppState,
    entity: &str,
    id: DbId,
    upload: PhotoUpload,
) -> AppResult<StoredObject> {
    let photo = validate_photo(upload.content_type.as_deref(), &upload.data)?;
    let unique = uuid::Uuid::new_v4().simple().to_string();
    let key = photo_key(entity, id, &unique, photo.extension);

    let stored = state
        .blob_store
        .put(&key, upload.data, photo.content_type)
        .await?;
    tracing::debug!(entity, id, key = %stored.key, size = stored.size_bytes, "Photo stored");
    Ok(stored)
}

/// Delete a blob, logging instead of failing. Used for superseded photos and
/// for blobs orphaned by a failed or raced update.
pub async fn discard_blob(state: &AppState, key: Option<&str>) {
    let Some(key) = key else { return };
    if let Err(e) = state.blob_store.delete(key).await {
        tracing::warn!(key, error = %e, "Failed to delete photo blob");
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Photo uploads are limited to {MAX_PHOTO_BYTES} bytes"
        ))
    } else {
        AppError::BadRequest(err.body_text())
    }
}

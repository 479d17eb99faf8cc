//! Client entity model and DTOs.

use inmo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    /// Blob-store key of the photo; internal, not exposed.
    #[serde(skip_serializing)]
    pub photo_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of `ClientRepo::set_photo`: the updated row plus the blob key it
/// replaced.
#[derive(Debug, Clone, FromRow)]
pub struct ClientPhotoChange {
    #[sqlx(flatten)]
    pub client: Client,
    pub previous_photo_key: Option<String>,
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing client. All fields are optional.
///
/// `None` keeps the stored value; an empty or whitespace-only string clears
/// an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

//! Architect entity model and DTOs.

use inmo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `architects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Architect {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub photo_url: Option<String>,
    #[serde(skip_serializing)]
    pub photo_key: Option<String>,
    /// Login account (rol `arquitecto`) linked to this profile, if any.
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Updated architect row plus the photo key it replaced.
#[derive(Debug, Clone, FromRow)]
pub struct ArchitectPhotoChange {
    #[sqlx(flatten)]
    pub architect: Architect,
    pub previous_photo_key: Option<String>,
}

/// DTO for creating a new architect.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArchitect {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub user_id: Option<DbId>,
}

/// DTO for updating an existing architect. All fields are optional.
///
/// A blank `phone`, `license_number` or `specialty` clears the field.
///
/// `user_id` can only be set here; use `ArchitectRepo::set_user` to unlink.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArchitect {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub user_id: Option<DbId>,
}

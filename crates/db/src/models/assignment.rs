//! Assignment entity model and DTOs.

use inmo_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An assignment row joined with the client and architect display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: String,
    pub architect_id: DbId,
    pub architect_name: String,
    pub property_address: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<Date>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new assignment. Status always starts as `pendiente`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignment {
    pub client_id: DbId,
    pub architect_id: DbId,
    pub property_address: String,
    pub description: Option<String>,
    pub due_date: Option<Date>,
    pub notes: Option<String>,
}

/// DTO for updating an assignment's details. Status changes go through
/// `AssignmentRepo::update_status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignment {
    pub client_id: Option<DbId>,
    pub architect_id: Option<DbId>,
    pub property_address: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Date>,
    pub notes: Option<String>,
}

/// Filters for listing assignments. `None` means "don't filter".
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub status: Option<String>,
    pub client_id: Option<DbId>,
    pub architect_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}

//! Repository for the `assignments` table.
//!
//! Reads always join `clients` and `architects` so rows carry display names.

use inmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{
    Assignment, AssignmentFilter, CreateAssignment, UpdateAssignment,
};

/// Select list over `a` (assignments), `c` (clients) and `ar` (architects).
const COLUMNS: &str = "a.id, a.client_id, c.name AS client_name, \
                       a.architect_id, ar.name AS architect_name, \
                       a.property_address, a.description, a.status, a.due_date, a.notes, \
                       a.created_by, a.created_at, a.updated_at";

const JOINS: &str = "JOIN clients c ON c.id = a.client_id \
                     JOIN architects ar ON ar.id = a.architect_id";

/// Provides CRUD operations for assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert a new assignment in status `pendiente`, returning the joined row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssignment,
        created_by: Option<DbId>,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "WITH a AS (
                INSERT INTO assignments
                    (client_id, architect_id, property_address, description, due_date, notes, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT {COLUMNS} FROM a {JOINS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(input.client_id)
            .bind(input.architect_id)
            .bind(&input.property_address)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(&input.notes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an assignment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assignments a {JOINS} WHERE a.id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assignments matching `filter`, soonest due date first
    /// (undated last), then newest.
    pub async fn list(
        pool: &PgPool,
        filter: &AssignmentFilter,
    ) -> Result<Vec<Assignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignments a {JOINS}
             WHERE ($1::TEXT IS NULL OR a.status = $1)
               AND ($2::BIGINT IS NULL OR a.client_id = $2)
               AND ($3::BIGINT IS NULL OR a.architect_id = $3)
             ORDER BY a.due_date ASC NULLS LAST, a.created_at DESC, a.id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(&filter.status)
            .bind(filter.client_id)
            .bind(filter.architect_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Update an assignment's details. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssignment,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "WITH a AS (
                UPDATE assignments SET
                    client_id = COALESCE($2, client_id),
                    architect_id = COALESCE($3, architect_id),
                    property_address = COALESCE($4, property_address),
                    description = COALESCE($5, description),
                    due_date = COALESCE($6, due_date),
                    notes = COALESCE($7, notes)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM a {JOINS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(input.client_id)
            .bind(input.architect_id)
            .bind(&input.property_address)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Move an assignment to `status`, but only if it is still in
    /// `expected_current`. Returns `None` when the row is missing or its
    /// status changed concurrently.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected_current: &str,
        status: &str,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "WITH a AS (
                UPDATE assignments SET status = $3
                WHERE id = $1 AND status = $2
                RETURNING *
             )
             SELECT {COLUMNS} FROM a {JOINS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(expected_current)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an assignment by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

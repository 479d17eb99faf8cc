//! Repository for the `architects` table.

use inmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::architect::{
    Architect, ArchitectPhotoChange, CreateArchitect, UpdateArchitect,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, license_number, specialty, \
                       photo_url, photo_key, user_id, created_at, updated_at";

/// Provides CRUD operations for architects.
pub struct ArchitectRepo;

impl ArchitectRepo {
    /// Insert a new architect, returning the created row.
    ///
    /// Blank optional fields are stored as `NULL`.
    pub async fn create(pool: &PgPool, input: &CreateArchitect) -> Result<Architect, sqlx::Error> {
        let query = format!(
            "INSERT INTO architects (name, email, phone, license_number, specialty, user_id)
             VALUES ($1, $2, NULLIF(BTRIM($3), ''), NULLIF(BTRIM($4), ''),
                     NULLIF(BTRIM($5), ''), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Architect>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.license_number)
            .bind(&input.specialty)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an architect by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Architect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM architects WHERE id = $1");
        sqlx::query_as::<_, Architect>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the architect profile linked to a login account.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Architect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM architects WHERE user_id = $1");
        sqlx::query_as::<_, Architect>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List architects ordered by name, optionally filtered by an `ILIKE`
    /// pattern matched against name, email, phone and specialty.
    pub async fn list(
        pool: &PgPool,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Architect>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM architects
             WHERE $1::TEXT IS NULL
                OR name ILIKE $1 OR email ILIKE $1
                OR phone ILIKE $1 OR specialty ILIKE $1
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Architect>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an architect. Only non-`None` fields in `input` are applied; a
    /// blank string clears an optional field to `NULL`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArchitect,
    ) -> Result<Option<Architect>, sqlx::Error> {
        let query = format!(
            "UPDATE architects SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = CASE WHEN $4::TEXT IS NULL THEN phone ELSE NULLIF(BTRIM($4), '') END,
                license_number =
                    CASE WHEN $5::TEXT IS NULL THEN license_number ELSE NULLIF(BTRIM($5), '') END,
                specialty =
                    CASE WHEN $6::TEXT IS NULL THEN specialty ELSE NULLIF(BTRIM($6), '') END,
                user_id = COALESCE($7, user_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Architect>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.license_number)
            .bind(&input.specialty)
            .bind(input.user_id)
            .fetch_optional(pool)
            .await
    }

    /// Link (or unlink, with `None`) a login account.
    pub async fn set_user(
        pool: &PgPool,
        id: DbId,
        user_id: Option<DbId>,
    ) -> Result<Option<Architect>, sqlx::Error> {
        let query = format!(
            "UPDATE architects SET user_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Architect>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Set (or clear, with `None`) the architect's photo URL and blob key.
    ///
    /// The previous key is read under the row lock, so concurrent uploads
    /// each get back the key they replaced.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        photo_url: Option<&str>,
        photo_key: Option<&str>,
    ) -> Result<Option<ArchitectPhotoChange>, sqlx::Error> {
        let query = format!(
            "WITH prev AS (
                SELECT id AS prev_id, photo_key AS previous_photo_key
                FROM architects WHERE id = $1 FOR UPDATE
             )
             UPDATE architects SET photo_url = $2, photo_key = $3
             FROM prev
             WHERE id = prev.prev_id
             RETURNING {COLUMNS}, prev.previous_photo_key"
        );
        sqlx::query_as::<_, ArchitectPhotoChange>(&query)
            .bind(id)
            .bind(photo_url)
            .bind(photo_key)
            .fetch_optional(pool)
            .await
    }

    /// Delete an architect by ID. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while assignments reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM architects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

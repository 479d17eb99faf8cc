//! Repository for the `clients` table.

use inmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, ClientPhotoChange, CreateClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, email, phone, address, notes, photo_url, photo_key, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    ///
    /// Blank optional fields are stored as `NULL`.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, email, phone, address, notes)
             VALUES ($1, NULLIF(BTRIM($2), ''), NULLIF(BTRIM($3), ''),
                     NULLIF(BTRIM($4), ''), NULLIF(BTRIM($5), ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a client by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients ordered by name, optionally filtered by an `ILIKE`
    /// pattern matched against name, email and phone.
    pub async fn list(
        pool: &PgPool,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE $1::TEXT IS NULL
                OR name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied; a
    /// blank string clears an optional field to `NULL`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                email = CASE WHEN $3::TEXT IS NULL THEN email ELSE NULLIF(BTRIM($3), '') END,
                phone = CASE WHEN $4::TEXT IS NULL THEN phone ELSE NULLIF(BTRIM($4), '') END,
                address = CASE WHEN $5::TEXT IS NULL THEN address ELSE NULLIF(BTRIM($5), '') END,
                notes = CASE WHEN $6::TEXT IS NULL THEN notes ELSE NULLIF(BTRIM($6), '') END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Set (or clear, with `None`) the client's photo URL and blob key.
    ///
    /// Also returns the key that was replaced, read under the row lock.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        photo_url: Option<&str>,
        photo_key: Option<&str>,
    ) -> Result<Option<ClientPhotoChange>, sqlx::Error> {
        let query = format!(
            "WITH prev AS (
                SELECT id AS prev_id, photo_key AS previous_photo_key
                FROM clients WHERE id = $1 FOR UPDATE
             )
             UPDATE clients SET photo_url = $2, photo_key = $3
             FROM prev
             WHERE id = prev.prev_id
             RETURNING {COLUMNS}, prev.previous_photo_key"
        );
        sqlx::query_as::<_, ClientPhotoChange>(&query)
            .bind(id)
            .bind(photo_url)
            .bind(photo_key)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client by ID. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while assignments reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Read-only aggregate queries for the dashboard summary.

use inmo_core::assignment::VALID_STATUSES;
use sqlx::PgPool;

use crate::models::dashboard::{EntityTotals, StatusCount};

pub struct DashboardRepo;

impl DashboardRepo {
    /// Count clients, architects and active users in one round trip.
    pub async fn entity_totals(pool: &PgPool) -> Result<EntityTotals, sqlx::Error> {
        sqlx::query_as::<_, EntityTotals>(
            "SELECT
                (SELECT COUNT(*) FROM clients) AS clients,
                (SELECT COUNT(*) FROM architects) AS architects,
                (SELECT COUNT(*) FROM users WHERE is_active) AS active_users",
        )
        .fetch_one(pool)
        .await
    }

    /// Assignment counts for every known status, zero-filled, in
    /// [`VALID_STATUSES`] order.
    pub async fn assignment_status_counts(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM assignments GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        Ok(VALID_STATUSES
            .iter()
            .map(|status| StatusCount {
                status: (*status).to_string(),
                count: rows
                    .iter()
                    .find(|r| r.status == *status)
                    .map_or(0, |r| r.count),
            })
            .collect())
    }
}

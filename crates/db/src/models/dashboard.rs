//! Aggregate rows for the dashboard summary.

use serde::Serialize;
use sqlx::FromRow;

/// Number of assignments currently in one status.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Entity totals shown on the dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EntityTotals {
    pub clients: i64,
    pub architects: i64,
    pub active_users: i64,
}

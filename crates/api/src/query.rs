//! Shared query parameter types for API handlers.

use inmo_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use inmo_core::types::DbId;
use serde::Deserialize;

/// Free-text search plus pagination (`?search=&limit=&offset=`).
///
/// Used by the client and architect list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    /// Limit clamped into `1..=100`, default 50.
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Offset clamped to non-negative.
    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Filters for `GET /assignments`.
#[derive(Debug, Default, Deserialize)]
pub struct AssignmentListParams {
    pub status: Option<String>,
    pub client_id: Option<DbId>,
    pub architect_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

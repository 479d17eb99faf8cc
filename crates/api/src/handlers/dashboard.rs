//! Handler for the dashboard summary.

use axum::extract::State;
use axum::Json;
use inmo_db::models::dashboard::StatusCount;
use inmo_db::repositories::DashboardRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for `GET /dashboard/summary`.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub clients: i64,
    pub architects: i64,
    pub active_users: i64,
    pub assignments_total: i64,
    /// One entry per status, zero-filled.
    pub assignments_by_status: Vec<StatusCount>,
}

/// GET /api/v1/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let totals = DashboardRepo::entity_totals(&state.pool).await?;
    let by_status = DashboardRepo::assignment_status_counts(&state.pool).await?;

    Ok(Json(DataResponse {
        data: DashboardSummary {
            clients: totals.clients,
            architects: totals.architects,
            active_users: totals.active_users,
            assignments_total: by_status.iter().map(|s| s.count).sum(),
            assignments_by_status: by_status,
        },
    }))
}

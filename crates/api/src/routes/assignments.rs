//! Route definitions for the `/assignments` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// GET    /               -> list_assignments (scoped to the caller)
/// POST   /               -> create_assignment (gestor)
/// GET    /{id}           -> get_assignment
/// PUT    /{id}           -> update_assignment (gestor)
/// DELETE /{id}           -> delete_assignment (gestor)
/// PATCH  /{id}/status    -> update_status (gestor or linked architect)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route(
            "/{id}",
            get(assignments::get_assignment)
                .put(assignments::update_assignment)
                .delete(assignments::delete_assignment),
        )
        .route("/{id}/status", patch(assignments::update_status))
}

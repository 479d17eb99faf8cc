pub mod architects;
pub mod assignments;
pub mod auth;
pub mod avatar;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod users;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use inmo_core::photo::{MAX_PHOTO_BYTES, MULTIPART_OVERHEAD_BYTES};

use crate::state::AppState;

/// Body limit for photo upload routes: the photo plus multipart framing.
pub const PHOTO_BODY_LIMIT: usize = MAX_PHOTO_BYTES + MULTIPART_OVERHEAD_BYTES;

/// Layer applied to the photo upload routes.
pub(crate) fn photo_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(PHOTO_BODY_LIMIT)
}

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (public)
/// /auth/me                                         current user
/// /auth/change-password                            change own password
///
/// /users                                           list, create (gestor only)
/// /users/{id}                                      get, update, deactivate
/// /users/{id}/reset-password                       reset password
///
/// /clients                                         list, create
/// /clients/{id}                                    get, update, delete
/// /clients/{id}/photo                              upload, remove (gestor only)
///
/// /architects                                      list, create
/// /architects/{id}                                 get, update, delete
/// /architects/{id}/photo                           upload, remove (gestor only)
/// /architects/{id}/assignments                     architect's assignments
///
/// /assignments                                     list (scoped), create
/// /assignments/{id}                                get, update, delete
/// /assignments/{id}/status                         change status (PATCH)
///
/// /dashboard/summary                               totals and status counts
///
/// /avatar/moods                                    available moods (public)
/// /avatar/chat                                     chat with the avatar (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, logout, me, change-password).
        .nest("/auth", auth::router())
        // Login account management.
        .nest("/users", users::router())
        // Directory entities.
        .nest("/clients", clients::router())
        .nest("/architects", architects::router())
        // Work orders.
        .nest("/assignments", assignments::router())
        .nest("/dashboard", dashboard::router())
        // Conversational avatar.
        .nest("/avatar", avatar::router())
}

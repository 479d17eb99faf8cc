//! Route definitions for the `/avatar` resource (public).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::avatar;
use crate::state::AppState;

/// Routes mounted at `/avatar`.
///
/// ```text
/// GET  /moods -> list_moods
/// POST /chat  -> chat
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/moods", get(avatar::list_moods))
        .route("/chat", post(avatar::chat))
}

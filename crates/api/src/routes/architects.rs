//! Route definitions for the `/architects` resource.

use axum::routing::{get, post};
use axum::Router;

use super::photo_body_limit;
use crate::handlers::architects;
use crate::state::AppState;

/// Routes mounted at `/architects`.
///
/// ```text
/// GET    /                    -> list_architects
/// POST   /                    -> create_architect
/// GET    /{id}                -> get_architect
/// PUT    /{id}                -> update_architect
/// DELETE /{id}                -> delete_architect
/// GET    /{id}/assignments    -> list_architect_assignments
/// POST   /{id}/photo          -> upload_photo (multipart)
/// DELETE /{id}/photo          -> delete_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(architects::list_architects).post(architects::create_architect),
        )
        .route(
            "/{id}",
            get(architects::get_architect)
                .put(architects::update_architect)
                .delete(architects::delete_architect),
        )
        .route(
            "/{id}/assignments",
            get(architects::list_architect_assignments),
        )
        .route(
            "/{id}/photo",
            post(architects::upload_photo)
                .delete(architects::delete_photo)
                .layer(photo_body_limit()),
        )
}

//! Route definitions for the `/clients` resource.

use axum::routing::{get, post};
use axum::Router;

use super::photo_body_limit;
use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// Reads need any session; writes need the `gestor` role.
///
/// ```text
/// GET    /              -> list_clients
/// POST   /              -> create_client
/// GET    /{id}          -> get_client
/// PUT    /{id}          -> update_client
/// DELETE /{id}          -> delete_client
/// POST   /{id}/photo    -> upload_photo (multipart)
/// DELETE /{id}/photo    -> delete_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list_clients).post(clients::create_client))
        .route(
            "/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/{id}/photo",
            post(clients::upload_photo)
                .delete(clients::delete_photo)
                .layer(photo_body_limit()),
        )
}

//! Session-cookie authentication extractor for Axum handlers.
//!
//! The cookie only proves who the caller is. Name, email, role and the
//! active flag are re-read from `users` on every request, so deactivation
//! and role changes apply to sessions that are already open.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inmo_core::error::CoreError;
use inmo_core::roles::is_gestor;
use inmo_core::types::DbId;
use inmo_db::repositories::UserRepo;

use crate::auth::session::{cookie_value, validate_token};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the session cookie and the current
/// `users` row.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, rol = %user.rol, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    /// The user's current role (`"gestor"` or `"arquitecto"`).
    pub rol: String,
}

impl AuthUser {
    pub fn is_gestor(&self) -> bool {
        is_gestor(&self.rol)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = &state.config.session;

        let token = cookie_value(&parts.headers, &session.cookie_name).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Not authenticated".into()))
        })?;

        let claims = validate_token(token, session).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Account is no longer active".into()))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            name: user.name,
            email: user.email,
            rol: user.rol,
        })
    }
}

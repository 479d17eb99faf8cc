//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement, so authorization is enforced at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inmo_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `gestor` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn gestor_only(RequireGestor(user): RequireGestor) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireGestor(pub AuthUser);

impl FromRequestParts<AppState> for RequireGestor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_gestor() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Gestor role required".into(),
            )));
        }
        Ok(RequireGestor(user))
    }
}

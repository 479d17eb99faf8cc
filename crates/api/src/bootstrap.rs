//! First-run provisioning.

use inmo_core::contact::{normalize_email, validate_email};
use inmo_core::error::CoreError;
use inmo_core::roles::ROLE_GESTOR;
use inmo_db::models::user::{CreateUser, User};
use inmo_db::repositories::UserRepo;
use inmo_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapGestor;
use crate::error::{AppError, AppResult};

/// Display name given to the bootstrap account.
const BOOTSTRAP_NAME: &str = "Gestor";

/// Create the initial gestor when the `users` table is empty.
///
/// Returns the created user, or `None` when users already exist.
pub async fn ensure_initial_gestor(
    pool: &DbPool,
    bootstrap: &BootstrapGestor,
) -> AppResult<Option<User>> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    let email = normalize_email(&bootstrap.email);
    validate_email(&email)?;
    validate_password_strength(&bootstrap.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&bootstrap.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: BOOTSTRAP_NAME.to_string(),
            email,
            password_hash,
            rol: ROLE_GESTOR.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap gestor created");
    Ok(Some(user))
}

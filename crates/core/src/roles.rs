//! Well-known role name constants.
//!
//! These must match the `ck_users_rol` check constraint in
//! `20260301000001_create_users_table.sql`.

use crate::error::CoreError;

/// Office manager: full read/write access to every resource.
pub const ROLE_GESTOR: &str = "gestor";
/// Architect: read access plus status updates on their own assignments.
pub const ROLE_ARQUITECTO: &str = "arquitecto";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_GESTOR, ROLE_ARQUITECTO];

/// Validate that a role string is one of the known roles.
pub fn validate_role(rol: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&rol) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid rol '{rol}'. Must be one of: {VALID_ROLES:?}"
        )))
    }
}

/// Whether the role grants management (write) access.
pub fn is_gestor(rol: &str) -> bool {
    rol == ROLE_GESTOR
}

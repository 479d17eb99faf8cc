//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from the session cookie.
//! - [`rbac::RequireGestor`] -- Requires the `gestor` role.

pub mod auth;
pub mod rbac;

//! Assignment status constants and transition rules.
//!
//! The string values are stored verbatim in `assignments.status` and must
//! match the `ck_assignments_status` check constraint.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Newly created, not started by the architect yet.
pub const STATUS_PENDIENTE: &str = "pendiente";
/// The architect is working on it.
pub const STATUS_EN_PROGRESO: &str = "en_progreso";
/// Work delivered. Terminal.
pub const STATUS_COMPLETADA: &str = "completada";
/// Called off by the office or the client. Can be re-opened.
pub const STATUS_CANCELADA: &str = "cancelada";

/// All valid assignment statuses, in display order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDIENTE,
    STATUS_EN_PROGRESO,
    STATUS_COMPLETADA,
    STATUS_CANCELADA,
];

/// Maximum length of the free-text `property_address` field.
pub const MAX_ADDRESS_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `pendiente`   -> `en_progreso`, `cancelada`
/// - `en_progreso` -> `completada`, `cancelada`, `pendiente`
/// - `cancelada`   -> `pendiente` (re-open)
/// - `completada`  -> nothing
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDIENTE => &[STATUS_EN_PROGRESO, STATUS_CANCELADA],
        STATUS_EN_PROGRESO => &[STATUS_COMPLETADA, STATUS_CANCELADA, STATUS_PENDIENTE],
        STATUS_CANCELADA => &[STATUS_PENDIENTE],
        _ => &[],
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid assignment status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Validate that a status transition from `current` to `next` is allowed.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_status(next)?;
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move assignment from '{current}' to '{next}'. Allowed: {allowed:?}"
        )))
    }
}

/// Validate the property address: required, trimmed, bounded.
pub fn validate_property_address(address: &str) -> Result<(), CoreError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "property_address must not be empty".into(),
        ));
    }
    if trimmed.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(CoreError::Validation(format!(
            "property_address must be at most {MAX_ADDRESS_LENGTH} characters"
        )));
    }
    Ok(())
}

//! Field-level checks shared by the entity, account, and task rules.

use crate::error::CoreError;
use crate::patch::Patch;

/// Map a blank optional value to `None`.
///
/// Two entities without an EIN must not collide on `uq_entities_ein`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Map a blank optional value in an update to `Patch::Null`.
pub fn blank_to_null(patch: Patch<String>) -> Patch<String> {
    match patch {
        Patch::Value(v) if v.trim().is_empty() => Patch::Null,
        other => other,
    }
}

/// Strip surrounding whitespace from a value compared by a unique constraint.
///
/// `" 12-3456789 "` and `"12-3456789"` must hit the same `uq_*` index.
pub fn trim_owned(value: &str) -> String {
    value.trim().to_string()
}

/// Reject empty or whitespace-only values for a required text column.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Reject values longer than the column allows (counted in characters).
pub fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validate a required text value on create.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    require_non_blank(field, value)?;
    check_max_len(field, value, max)
}

/// Validate a required text column on update.
///
/// Absent is accepted, `null` is rejected (the column is `NOT NULL`), and a
/// supplied value goes through [`required_text`].
pub fn required_text_patch(field: &str, patch: &Patch<String>, max: usize) -> Result<(), CoreError> {
    match patch {
        Patch::Absent => Ok(()),
        Patch::Null => Err(CoreError::Validation(format!("{field} cannot be null"))),
        Patch::Value(v) => required_text(field, v, max),
    }
}

/// Validate an optional text column on update. Only the length is checked.
pub fn optional_text_patch(field: &str, patch: &Patch<String>, max: usize) -> Result<(), CoreError> {
    match patch.value() {
        Some(v) => check_max_len(field, v, max),
        None => Ok(()),
    }
}

/// Reject `null` for a non-nullable, non-text column on update.
pub fn reject_null<T>(field: &str, patch: &Patch<T>) -> Result<(), CoreError> {
    if matches!(patch, Patch::Null) {
        return Err(CoreError::Validation(format!("{field} cannot be null")));
    }
    Ok(())
}

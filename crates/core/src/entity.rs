//! Legal entity constants and validation.

use crate::error::CoreError;
use crate::patch::Patch;
use crate::validation::{check_max_len, optional_text_patch, required_text, required_text_patch};

/// Status assigned when a create request omits it.
pub const DEFAULT_ENTITY_STATUS: &str = "active";

pub const MAX_ENTITY_NAME_LEN: usize = 255;
pub const MAX_EIN_LEN: usize = 20;
pub const MAX_STATE_LEN: usize = 100;
pub const MAX_ENTITY_TYPE_LEN: usize = 100;
pub const MAX_ENTITY_STATUS_LEN: usize = 50;

/// Validate the text fields of a new entity.
pub fn validate_new_entity(
    entity_name: &str,
    ein: Option<&str>,
    state_of_formation: Option<&str>,
    entity_type: Option<&str>,
    status: Option<&str>,
) -> Result<(), CoreError> {
    required_text("entity_name", entity_name, MAX_ENTITY_NAME_LEN)?;
    if let Some(ein) = ein {
        required_text("ein", ein, MAX_EIN_LEN)?;
    }
    if let Some(state) = state_of_formation {
        check_max_len("state_of_formation", state, MAX_STATE_LEN)?;
    }
    if let Some(entity_type) = entity_type {
        check_max_len("entity_type", entity_type, MAX_ENTITY_TYPE_LEN)?;
    }
    if let Some(status) = status {
        required_text("status", status, MAX_ENTITY_STATUS_LEN)?;
    }
    Ok(())
}

/// Validate the text fields of an entity update.
///
/// An EIN may be cleared with `null` but not set to a blank string, since
/// blank values would collide under the uniqueness constraint.
pub fn validate_entity_patch(
    entity_name: &Patch<String>,
    ein: &Patch<String>,
    state_of_formation: &Patch<String>,
    entity_type: &Patch<String>,
    status: &Patch<String>,
) -> Result<(), CoreError> {
    required_text_patch("entity_name", entity_name, MAX_ENTITY_NAME_LEN)?;
    if let Some(ein) = ein.value() {
        required_text("ein", ein, MAX_EIN_LEN)?;
    }
    optional_text_patch("state_of_formation", state_of_formation, MAX_STATE_LEN)?;
    optional_text_patch("entity_type", entity_type, MAX_ENTITY_TYPE_LEN)?;
    required_text_patch("status", status, MAX_ENTITY_STATUS_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_entity_is_valid() {
        assert!(validate_new_entity("Acme LLC", Some("12-3456789"), None, None, None).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_new_entity("", None, None, None, None).is_err());
    }

    #[test]
    fn blank_ein_is_rejected() {
        assert!(validate_new_entity("Acme", Some(" "), None, None, None).is_err());
    }

    #[test]
    fn overlong_ein_is_rejected() {
        let ein = "1".repeat(MAX_EIN_LEN + 1);
        assert!(validate_new_entity("Acme", Some(&ein), None, None, None).is_err());
    }

    #[test]
    fn patch_may_clear_ein_but_not_name_or_status() {
        let ok = validate_entity_patch(
            &Patch::Absent,
            &Patch::Null,
            &Patch::Null,
            &Patch::Null,
            &Patch::Absent,
        );
        assert!(ok.is_ok());

        let name_cleared = validate_entity_patch(
            &Patch::Null,
            &Patch::Absent,
            &Patch::Absent,
            &Patch::Absent,
            &Patch::Absent,
        );
        assert!(name_cleared.is_err());

        let status_cleared = validate_entity_patch(
            &Patch::Absent,
            &Patch::Absent,
            &Patch::Absent,
            &Patch::Absent,
            &Patch::Null,
        );
        assert!(status_cleared.is_err());
    }
}

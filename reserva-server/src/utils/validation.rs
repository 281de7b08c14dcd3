//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: zone, dish, category
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions (reservation notes, dish descriptions)
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_required_text() {
        assert!(validate_required_text("  ", "Name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Terraza", "Name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn rejects_overlong_text() {
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert!(validate_required_text(&long, "Notes", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "Notes", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&None, "Notes", MAX_NOTE_LEN).is_ok());
    }
}

//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied at
//! the handler boundary.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: expense categories, usernames, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions (cut notes, expense descriptions)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: receipt numbers, cut numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

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

/// Validate an expense amount: finite and strictly positive.
///
/// Cut figures deliberately tolerate anything (they degrade to zero), but a
/// ledger entry with no usable amount is a data-entry mistake worth
/// rejecting at the door.
pub fn validate_expense_amount(value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation("amount must be a finite number"));
    }
    if value <= 0.0 {
        return Err(AppError::validation(format!(
            "amount must be positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_oversized() {
        assert!(validate_required_text("nomina", "expense_type", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "expense_type", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "expense_type", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn expense_amount_must_be_positive() {
        assert!(validate_expense_amount(120.50).is_ok());
        assert!(validate_expense_amount(0.0).is_err());
        assert!(validate_expense_amount(-5.0).is_err());
        assert!(validate_expense_amount(f64::NAN).is_err());
    }
}

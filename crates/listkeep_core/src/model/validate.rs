//! Field validators for user-entered text.
//!
//! Lengths are counted in Unicode scalar values, which matches SQLite
//! `length()` on TEXT columns used by the table CHECK constraints.

pub const NAME_MAX_CHARS: usize = 100;
pub const RECORD_TEXT_MAX_CHARS: usize = 500;

/// Input failed a field constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{field}`: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Validates an already-trimmed collection name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_text("name", name, NAME_MAX_CHARS)
}

/// Validates already-trimmed record text.
pub fn validate_record_text(text: &str) -> Result<(), ValidationError> {
    validate_text("text", text, RECORD_TEXT_MAX_CHARS)
}

fn validate_text(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, value, "must not be empty"));
    }
    let chars = value.chars().count();
    if chars > max_chars {
        return Err(ValidationError::new(
            field,
            value,
            format!("must be at most {max_chars} characters, got {chars}"),
        ));
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new(
            field,
            value,
            "must not contain control characters",
        ));
    }
    Ok(())
}

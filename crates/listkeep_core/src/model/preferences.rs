//! Singleton preferences row.
//!
//! # Invariants
//! - Exactly one row exists (id = 1), created by migration 3.
//! - `overrides` is only meaningful while `selection_id == CUSTOM_SELECTION_ID`.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_SELECTION_ID: &str = "default";
/// Selection that activates the override map.
pub const CUSTOM_SELECTION_ID: &str = "custom";

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid color regex")
});

/// Free-form key to color value map, e.g. `primary -> #FF8800`.
pub type ColorOverrides = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub selection_id: String,
    pub overrides: Option<ColorOverrides>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Preferences {
    pub fn uses_overrides(&self) -> bool {
        self.selection_id == CUSTOM_SELECTION_ID
    }
}

/// Trims and validates a selection identifier.
pub fn normalize_selection_id(selection_id: &str) -> Result<String, ValidationError> {
    let trimmed = selection_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            "selection_id",
            selection_id,
            "must not be empty",
        ));
    }
    Ok(trimmed.to_string())
}

/// Rejects blank keys and values that are not `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
pub fn validate_overrides(overrides: &ColorOverrides) -> Result<(), ValidationError> {
    for (key, value) in overrides {
        if key.trim().is_empty() {
            return Err(ValidationError::new(
                "overrides",
                key.as_str(),
                "override keys must not be blank",
            ));
        }
        if !HEX_COLOR_RE.is_match(value) {
            return Err(ValidationError::new(
                "overrides",
                value.as_str(),
                format!("override `{key}` must be a hex color"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_selection_id, validate_overrides, ColorOverrides};

    #[test]
    fn accepts_short_long_and_alpha_hex() {
        let overrides: ColorOverrides = [
            ("primary".to_string(), "#fa0".to_string()),
            ("surface".to_string(), "#112233".to_string()),
            ("scrim".to_string(), "#11223344".to_string()),
        ]
        .into_iter()
        .collect();
        assert!(validate_overrides(&overrides).is_ok());
    }

    #[test]
    fn rejects_named_colors_and_blank_keys() {
        let named: ColorOverrides = [("primary".to_string(), "red".to_string())]
            .into_iter()
            .collect();
        assert_eq!(validate_overrides(&named).unwrap_err().value, "red");

        let blank: ColorOverrides = [(" ".to_string(), "#000".to_string())]
            .into_iter()
            .collect();
        assert!(validate_overrides(&blank).is_err());
    }

    #[test]
    fn selection_id_is_trimmed() {
        assert_eq!(normalize_selection_id(" dark ").unwrap(), "dark");
        assert!(normalize_selection_id("   ").is_err());
    }
}

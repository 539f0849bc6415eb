//! Item and ingredient names
//!
//! Names are free text (Hangul is common) but trimmed, non-empty and at most
//! 100 characters, matching the column constraint.

use super::ValidationError;

/// Maximum length for item and ingredient names, in characters
const MAX_NAME_LEN: usize = 100;

fn validate(field: &'static str, s: &str) -> Result<String, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain control characters",
        });
    }
    Ok(trimmed.to_owned())
}

/// Validated product name, unique per user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemName(String);

impl ItemName {
    /// # Example
    /// ```
    /// use stallctl_server::models::ItemName;
    ///
    /// assert_eq!(ItemName::new("  팥붕 ").unwrap().as_str(), "팥붕");
    /// assert!(ItemName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate("item name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated raw material name, unique per user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientName(String);

impl IngredientName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate("ingredient name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

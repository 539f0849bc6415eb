//! Free-text notes on sales days and timer sessions

use super::ValidationError;

const MAX_MEMO_LEN: usize = 2_000;

/// Memo text; may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memo(String);

impl Memo {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() > MAX_MEMO_LEN {
            return Err(ValidationError::TooLong {
                field: "memo",
                max: MAX_MEMO_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_memo_is_allowed() {
        assert_eq!(Memo::new("").unwrap().as_str(), "");
    }

    #[test]
    fn long_memo_is_rejected() {
        assert!(Memo::new(&"비".repeat(2_000)).is_ok());
        assert!(matches!(
            Memo::new(&"비".repeat(2_001)),
            Err(ValidationError::TooLong { field: "memo", .. })
        ));
    }
}

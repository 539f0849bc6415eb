//! Numeric request inputs

use rust_decimal::Decimal;

use super::ValidationError;

/// Largest number of units a single tap may add or undo
const MAX_SALE_DELTA: i32 = 1_000;

/// Largest bundle an item can be sold in
const MAX_BUNDLE_SIZE: i32 = 1_000;

/// NUMERIC(10,2) holds at most 8 integer digits
const MAX_AMOUNT: i64 = 100_000_000;

/// Positive number of units for a sale or an undo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleDelta(i32);

impl SaleDelta {
    pub fn new(delta: i32) -> Result<Self, ValidationError> {
        if delta <= 0 {
            return Err(ValidationError::OutOfRange {
                field: "delta",
                reason: "must be positive",
            });
        }
        if delta > MAX_SALE_DELTA {
            return Err(ValidationError::OutOfRange {
                field: "delta",
                reason: "must be at most 1000",
            });
        }
        Ok(Self(delta))
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

/// Units per bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleSize(i32);

impl BundleSize {
    /// Bundle size used when a request omits it
    pub const DEFAULT: BundleSize = BundleSize(3);

    pub fn new(size: i32) -> Result<Self, ValidationError> {
        if !(1..=MAX_BUNDLE_SIZE).contains(&size) {
            return Err(ValidationError::OutOfRange {
                field: "bundle size",
                reason: "must be between 1 and 1000",
            });
        }
        Ok(Self(size))
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl Default for BundleSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Non-negative money or weight value with at most two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(field: &'static str, value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field,
                reason: "cannot be negative",
            });
        }
        if value >= Decimal::from(MAX_AMOUNT) {
            return Err(ValidationError::OutOfRange {
                field,
                reason: "is too large",
            });
        }
        if value.normalize().scale() > 2 {
            return Err(ValidationError::InvalidFormat {
                field,
                reason: "at most two decimal places",
            });
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> Decimal {
        self.0
    }
}

/// Length of a timer session in seconds (at most a day)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDuration(i32);

impl TimerDuration {
    const MAX_SECONDS: i32 = 86_400;

    pub fn new(seconds: i32) -> Result<Self, ValidationError> {
        if !(0..=Self::MAX_SECONDS).contains(&seconds) {
            return Err(ValidationError::OutOfRange {
                field: "duration_seconds",
                reason: "must be between 0 and 86400",
            });
        }
        Ok(Self(seconds))
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

/// Row limit for list endpoints, clamped to 1..=200
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimit(i64);

impl ListLimit {
    const DEFAULT: i64 = 50;
    const MAX: i64 = 200;

    pub fn new(limit: Option<i64>) -> Self {
        Self(limit.unwrap_or(Self::DEFAULT).clamp(1, Self::MAX))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl Default for ListLimit {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn timer_duration_bounds() {
        assert_eq!(TimerDuration::new(0).unwrap().get(), 0);
        assert!(TimerDuration::new(-5).is_err());
        assert!(TimerDuration::new(86_401).is_err());
    }

    #[test]
    fn list_limit_clamps() {
        assert_eq!(ListLimit::default().get(), 50);
        assert_eq!(ListLimit::new(Some(0)).get(), 1);
        assert_eq!(ListLimit::new(Some(10_000)).get(), 200);
    }

    #[test]
    fn sale_delta_bounds() {
        assert_eq!(SaleDelta::new(3).unwrap().get(), 3);
        assert!(SaleDelta::new(0).is_err());
        assert!(SaleDelta::new(-1).is_err());
        assert!(SaleDelta::new(1_000).is_ok());
        assert!(SaleDelta::new(1_001).is_err());
    }

    #[test]
    fn bundle_size_defaults_to_three() {
        assert_eq!(BundleSize::default().get(), 3);
        assert!(BundleSize::new(0).is_err());
        assert!(BundleSize::new(12).is_ok());
    }

    #[test]
    fn amount_rules() {
        assert_eq!(Amount::new("price", dec!(2000)).unwrap().get(), dec!(2000));
        assert!(Amount::new("price", dec!(0)).is_ok());
        assert!(Amount::new("price", dec!(12.50)).is_ok());
        // trailing zeros beyond two places are still two places
        assert!(Amount::new("price", dec!(1.2500)).is_ok());

        let err = Amount::new("price", dec!(-1)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "price", .. }));
        assert!(Amount::new("price", dec!(0.125)).is_err());
        assert!(Amount::new("price", dec!(100000000)).is_err());
    }
}

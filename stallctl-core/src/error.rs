/// Structured error types for stallctl-core.
///
/// Library consumers get composable `thiserror` errors; the CLI wraps them
/// in `anyhow` where convenient.
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for stallctl-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Sale and undo amounts must be strictly positive
    #[error("delta must be positive, got {delta}")]
    NonPositiveDelta { delta: i32 },

    /// Undo requested more units than were sold
    #[error("cannot undo {requested} units, only {available} recorded")]
    InsufficientQuantity { requested: i32, available: i32 },

    /// Items are sold in bundles of at least one unit
    #[error("bundle size must be positive, got {size}")]
    InvalidBundleSize { size: i32 },

    /// Prices, costs and weights cannot be negative
    #[error("{field} cannot be negative")]
    NegativeAmount { field: &'static str },

    /// Month outside 1..=12 or a year chrono cannot represent
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Custom range whose start falls after its end
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Unrecognised timer kind
    #[error("unknown timer type '{value}'")]
    UnknownTimerKind { value: String },
}

/// Result type alias for stallctl-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

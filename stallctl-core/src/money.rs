//! Money on the wire
//!
//! Figures are computed at full precision (a third of a bundle price has no
//! finite decimal form) and rounded to cents only when serialized, matching
//! the `NUMERIC(10,2)` columns they are compared against.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

/// Decimal places kept for amounts of money
pub const MONEY_DP: u32 = 2;

/// Round half away from zero to cents.
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// `#[serde(serialize_with = "...")]` helper for money fields.
pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    Serialize::serialize(&round(*value), serializer)
}

//! Request models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod date;
pub mod memo;
pub mod name;
pub mod quantity;
pub mod validation;

pub use date::{parse_date, parse_optional_date};
pub use memo::Memo;
pub use name::{IngredientName, ItemName};
pub use quantity::{Amount, BundleSize, ListLimit, SaleDelta, TimerDuration};
pub use validation::ValidationError;

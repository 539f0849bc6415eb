//! stallctl-core: cost accounting and sales analytics for a food stall
//!
//! Pure domain logic with no I/O beyond reading the config file. The server
//! crate loads rows from Postgres and hands them to these types.

pub mod buckets;
pub mod config;
pub mod cost;
pub mod error;
pub mod money;
pub mod period;
pub mod timer;
pub mod totals;
pub mod undo;
pub mod usage;

pub use buckets::{TimeBucket, TimeDistribution};
pub use config::StallConfig;
pub use cost::{CostModel, ItemPricing, LineFigures, RecipeLine};
pub use error::{CoreError, Result};
pub use period::{month_bounds, today_in, DateRange, Period};
pub use timer::TimerKind;
pub use totals::{ItemStat, ItemStats, Totals};
pub use undo::{plan_undo, EventId, LoggedDelta, Reduction, UndoPlan};
pub use usage::{IngredientUsage, UsageFigures};

//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - Every query is scoped to the owning user
//! - Uniqueness is enforced by constraints and surfaced as `Conflict`
//! - Uses transactions for multi-step operations

pub mod ingredients;
pub mod items;
pub mod recipes;
pub mod reports;
pub mod sales;
pub mod timers;
pub mod users;

use chrono::NaiveDate;
use stallctl_core::CoreError;

pub use ingredients::{Ingredient, IngredientRepo};
pub use items::{Item, ItemRepo, ItemUpdate};
pub use recipes::{CostBook, CostEntry, RecipeComponent, RecipeRepo};
pub use reports::{DayCounts, LoggedEvent, ReportRepo};
pub use sales::{SaleOutcome, SalesCount, SalesDay, SalesRepo};
pub use timers::{TimerLog, TimerRepo};
pub use users::{User, UserRepo};

/// Primary key type shared by all tables
pub type Id = i64;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} '{name}' already exists")]
    Conflict { resource: &'static str, name: String },

    #[error("no sales recorded for item {item_id} on {date}")]
    NoSalesData { item_id: Id, date: NaiveDate },

    #[error(transparent)]
    Domain(#[from] CoreError),
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Map a unique-constraint violation to `Conflict`, passing other errors through.
    pub(crate) fn conflict_on_unique<'n>(
        resource: &'static str,
        name: &'n str,
    ) -> impl FnOnce(sqlx::Error) -> DbError + 'n {
        move |err| {
            let unique = err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                DbError::Conflict {
                    resource,
                    name: name.to_owned(),
                }
            } else {
                DbError::Sqlx(err)
            }
        }
    }
}

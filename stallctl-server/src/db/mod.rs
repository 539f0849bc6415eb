//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool, never a shared connection behind a mutex
//! - Lists load related rows with JOINs or one extra query, never per row
//! - Rely on DB unique constraints and upserts, not check-then-insert
//! - Multi-step mutations run in a single transaction

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;

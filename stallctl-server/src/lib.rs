//! stallctl-server: JSON API for stall sales counting and cost reports
//!
//! - `db`: pool, migrations and repositories (sqlx/Postgres)
//! - `models`: request inputs validated at construction
//! - `report`: day, calendar and period aggregation over a `CostBook`
//! - `http`: axum routes, error mapping and the server loop

pub mod db;
pub mod http;
pub mod models;
pub mod report;

pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};

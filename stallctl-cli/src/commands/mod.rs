//! Command implementations for the stallctl CLI

pub mod config;
pub mod migrate;
pub mod serve;
pub mod user;

pub use config::run_config;
pub use migrate::run_migrate;
pub use serve::run_serve;
pub use user::run_user;

use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;
use stallctl_core::StallConfig;
use stallctl_server::db::create_pool_with_options;

/// Database connection flag shared by commands that touch Postgres
#[derive(Args, Debug, Default)]
pub struct DbArgs {
    /// Database URL (overrides config file and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl DbArgs {
    pub fn resolve(&self, config: &StallConfig) -> Result<String> {
        self.database_url
            .clone()
            .or_else(|| config.database_url.clone())
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, .env, or ~/.stallctl/config.toml")
    }

    pub async fn connect(&self, config: &StallConfig) -> Result<PgPool> {
        let url = self.resolve(config)?;
        create_pool_with_options(&url, config.max_connections)
            .await
            .context("Failed to create database pool")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_config() {
        let config = StallConfig {
            database_url: Some("postgres://config/db".into()),
            ..StallConfig::default()
        };
        let args = DbArgs {
            database_url: Some("postgres://flag/db".into()),
        };
        assert_eq!(args.resolve(&config).unwrap(), "postgres://flag/db");
        assert_eq!(DbArgs::default().resolve(&config).unwrap(), "postgres://config/db");
    }

    #[test]
    fn missing_url_is_an_error() {
        assert!(DbArgs::default().resolve(&StallConfig::default()).is_err());
    }
}

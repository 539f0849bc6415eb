//! `stallctl migrate` - create or update the schema

use anyhow::{Context, Result};
use clap::Parser;
use stallctl_core::StallConfig;
use stallctl_server::db::migrations;

use super::DbArgs;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

pub async fn run_migrate(args: MigrateArgs, config: StallConfig) -> Result<()> {
    let pool = args.db.connect(&config).await?;
    migrations::run(&pool).await.context("Migration failed")?;
    println!("Schema is up to date");
    Ok(())
}

//! `stallctl serve` - run the JSON API

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use stallctl_core::StallConfig;
use stallctl_server::{run_server, ServerConfig};

use super::DbArgs;

#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default from config: 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// IANA timezone for "today" and time-of-day buckets (e.g. Asia/Seoul)
    #[arg(long)]
    pub timezone: Option<String>,

    #[command(flatten)]
    pub db: DbArgs,
}

impl ServeArgs {
    /// Command-line flags take precedence over file and environment.
    fn apply_to(&self, config: &mut StallConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if self.cors_permissive {
            config.cors_permissive = true;
        }
        if let Some(tz) = &self.timezone {
            config.timezone = tz.clone();
        }
    }
}

pub async fn run_serve(args: ServeArgs, mut config: StallConfig) -> Result<()> {
    args.apply_to(&mut config);
    let timezone = config.tz()?;

    let pool = args.db.connect(&config).await?;

    tracing::info!(bind = %config.bind, %timezone, "Starting stallctl server");
    let server = ServerConfig {
        bind_addr: config.bind,
        cors_permissive: config.cors_permissive,
        timezone,
    };

    run_server(pool, server).await.context("Server error")?;
    Ok(())
}

//! stallctl - sales counter and cost reports for a food stall
//!
//! - `serve`: run the JSON API behind an authenticating proxy
//! - `migrate`: create or update the Postgres schema
//! - `user`: register the usernames the proxy forwards
//! - `config`: locate, show or create ~/.stallctl/config.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stallctl_core::StallConfig;

mod commands;
mod tracing_setup;

use commands::config::ConfigArgs;
use commands::migrate::MigrateArgs;
use commands::serve::ServeArgs;
use commands::user::UserArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "stallctl",
    author,
    version,
    about = "Sales counting, recipe costing and reports for a small food stall"
)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create or update the database schema
    Migrate(MigrateArgs),
    /// Manage users
    User(UserArgs),
    /// Manage the config file
    Config(ConfigArgs),
}

fn load_config() -> Result<StallConfig> {
    StallConfig::load().with_context(|| {
        format!(
            "Failed to load configuration from {}",
            StallConfig::config_path().display()
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, load_config()?).await,
        Commands::Migrate(args) => commands::run_migrate(args, load_config()?).await,
        Commands::User(args) => commands::run_user(args, load_config()?).await,
        Commands::Config(args) => commands::run_config(args),
    };

    tracing_setup::shutdown_otel();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stallctl", "serve", "--debug", "--bind", "0.0.0.0:9000"]).unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.bind.unwrap().port(), 9000),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! `stallctl config` - inspect and create ~/.stallctl/config.toml

use std::fs;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stallctl_core::StallConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective configuration (file + environment)
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Runs without a loaded config so a broken file can still be located or replaced.
pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", StallConfig::config_path().display());
        }
        ConfigCommands::Show => {
            let config = StallConfig::load()?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigCommands::Init { force } => run_init(force)?,
    }
    Ok(())
}

fn run_init(force: bool) -> Result<()> {
    let path = StallConfig::config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    fs::write(&path, StallConfig::default().to_toml_string()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

//! `stallctl user` - manage the owners that the proxy maps logins to

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stallctl_core::StallConfig;
use stallctl_server::db::{migrations, UserRepo};

use super::DbArgs;

#[derive(Parser, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a username (must match the proxy's x-remote-user value)
    Add { username: String },
    /// List registered users
    List,
}

pub async fn run_user(args: UserArgs, config: StallConfig) -> Result<()> {
    let pool = args.db.connect(&config).await?;
    migrations::run(&pool).await.context("Migration failed")?;
    let users = UserRepo::new(&pool);

    match args.command {
        UserCommands::Add { username } => {
            let username = username.trim();
            if username.is_empty() {
                bail!("username cannot be empty");
            }
            let user = users
                .create(username)
                .await
                .with_context(|| format!("Failed to add user '{username}'"))?;
            tracing::info!(user_id = user.id, username = %user.username, "user added");
            println!("{}\t{}", user.id, user.username);
        }
        UserCommands::List => {
            for user in users.list().await.context("Failed to list users")? {
                println!("{}\t{}\t{}", user.id, user.username, user.created_at.format("%Y-%m-%d"));
            }
        }
    }
    Ok(())
}

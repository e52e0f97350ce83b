use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use std::path::Path;

use crate::api::{QueueApi, UserId};

use super::{connect, load_config};

#[derive(Args)]
pub struct UserCommands {
    #[command(subcommand)]
    pub command: UserSubcommands,
}

#[derive(Subcommand)]
pub enum UserSubcommands {
    /// List all users
    List,
    /// Show your profile and the queues you host
    Me {
        /// Your user id
        id: UserId,
    },
}

pub async fn users_command(args: UserCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let client = connect(&config)?;

    match args.command {
        UserSubcommands::List => {
            let users = client.get_users().await?;
            for user in &users {
                println!("  {:<10} {}", user.username.bright_blue(), user.display_name());
            }
            println!("\nTotal users: {}", users.len());
        }
        UserSubcommands::Me { id } => {
            let me = client.get_my_user(id).await?;
            println!("{}", me.user.display_name().bold());
            if let Some(queue) = &me.my_queue {
                let place = queue
                    .line_place
                    .map(|p| format!(", place {}", p + 1))
                    .unwrap_or_default();
                println!("  In line for {}{}", queue.name.bright_cyan(), place);
            }
            if me.hosted_queues.is_empty() {
                println!("  {}", "Not hosting any queues".dimmed());
            }
            for queue in &me.hosted_queues {
                println!("  {:>5}  {}", queue.id.to_string().bright_blue(), queue.name);
            }
        }
    }

    Ok(())
}

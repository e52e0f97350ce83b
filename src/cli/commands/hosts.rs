use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use std::path::Path;

use crate::api::QueueId;
use crate::editor::Resolution;
use crate::ui::prompts::decide;
use crate::validation::sanitize_uniqname;

use super::{finish, load_config, load_editor};

#[derive(Args)]
pub struct HostCommands {
    #[command(subcommand)]
    pub command: HostSubcommands,
}

#[derive(Subcommand)]
pub enum HostSubcommands {
    /// Make a user a host of the queue
    Add {
        /// Queue id
        queue: QueueId,
        /// Uniqname of the new host
        uniqname: String,
    },
    /// Remove a host from the queue
    Remove {
        /// Queue id
        queue: QueueId,
        /// Uniqname of the host
        uniqname: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn hosts_command(args: HostCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        HostSubcommands::Add { queue, uniqname } => {
            let editor = load_editor(&config, queue).await?;
            finish(editor.add_host(&uniqname).await)?;
            println!(
                "{} {} is a host of queue {}",
                "✓".bright_green().bold(),
                sanitize_uniqname(&uniqname).bright_green().bold(),
                queue
            );
            Ok(())
        }
        HostSubcommands::Remove { queue, uniqname, yes } => {
            let editor = load_editor(&config, queue).await?;
            let username = sanitize_uniqname(&uniqname);
            let host = editor
                .queue()
                .and_then(|q| q.hosts.into_iter().find(|h| h.username == username))
                .ok_or_else(|| anyhow::anyhow!("{} is not a host of queue {}", username, queue))?;

            let confirmation = editor.request_remove_host(&host)?;
            let decision = decide(&confirmation, yes)?;
            match editor.resolve(confirmation, decision).await {
                Resolution::Cancelled => println!("Operation cancelled."),
                Resolution::Ran(outcome) => {
                    finish(outcome)?;
                    println!("{} Removed host {}", "✓".bright_green().bold(), username);
                }
            }
            Ok(())
        }
    }
}

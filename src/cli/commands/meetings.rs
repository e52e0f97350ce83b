use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use std::path::Path;

use crate::api::{MeetingId, QueueId};
use crate::editor::Resolution;
use crate::ui::prompts::decide;
use crate::validation::sanitize_uniqname;

use super::{finish, load_config, load_editor};

#[derive(Args)]
pub struct MeetingCommands {
    #[command(subcommand)]
    pub command: MeetingSubcommands,
}

#[derive(Subcommand)]
pub enum MeetingSubcommands {
    /// Add a meeting with a user to the queue
    Add {
        /// Queue id
        queue: QueueId,
        /// Uniqname of the attendee
        uniqname: String,
    },
    /// Remove a meeting from the queue
    Remove {
        /// Queue id
        queue: QueueId,
        /// Meeting id, as shown by `queues show`
        meeting: MeetingId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn meetings_command(args: MeetingCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        MeetingSubcommands::Add { queue, uniqname } => {
            let editor = load_editor(&config, queue).await?;
            finish(editor.add_meeting(&uniqname).await)?;
            println!(
                "{} Added a meeting with {} to queue {}",
                "✓".bright_green().bold(),
                sanitize_uniqname(&uniqname).bright_green().bold(),
                queue
            );
            Ok(())
        }
        MeetingSubcommands::Remove { queue, meeting, yes } => {
            let editor = load_editor(&config, queue).await?;
            let found = editor
                .queue()
                .and_then(|q| q.meeting_set.into_iter().find(|m| m.id == meeting))
                .ok_or_else(|| anyhow::anyhow!("Meeting {} is not on queue {}", meeting, queue))?;

            let confirmation = editor.request_remove_meeting(&found);
            let decision = decide(&confirmation, yes)?;
            match editor.resolve(confirmation, decision).await {
                Resolution::Cancelled => println!("Operation cancelled."),
                Resolution::Ran(outcome) => {
                    finish(outcome)?;
                    println!("{} Removed meeting {}", "✓".bright_green().bold(), meeting);
                }
            }
            Ok(())
        }
    }
}

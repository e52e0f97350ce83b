use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use log::info;
use std::path::Path;

use crate::api::{ManageQueue, QueueApi, QueueId, QueueView, constants};
use crate::editor::Resolution;
use crate::ui::prompts::{decide, text_input};

use super::{connect, finish, load_config, load_editor};

#[derive(Args)]
pub struct QueueCommands {
    #[command(subcommand)]
    pub command: QueueSubcommands,
}

#[derive(Subcommand)]
pub enum QueueSubcommands {
    /// List the queues you host
    List,
    /// Show one queue with its hosts and meetings
    Show {
        /// Queue id
        id: QueueId,
    },
    /// Create a queue hosted by you
    Create {
        /// Queue name
        name: String,
    },
    /// Rename a queue
    Rename {
        /// Queue id
        id: QueueId,
        /// New name
        name: String,
    },
    /// Change a queue's description (prompts when omitted)
    Describe {
        /// Queue id
        id: QueueId,
        /// New description
        description: Option<String>,
    },
    /// Permanently delete a queue
    Delete {
        /// Queue id
        id: QueueId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Search queues by name
    Search {
        /// Search term
        term: String,
    },
}

pub async fn queues_command(args: QueueCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        QueueSubcommands::List => {
            let client = connect(&config)?;
            let queues = client.get_queues().await?;
            if queues.is_empty() {
                println!("  {}", "No queues found".bright_yellow());
                return Ok(());
            }
            for queue in &queues {
                println!(
                    "  {:>5}  {}  {}",
                    queue.id.to_string().bright_blue(),
                    queue.name.bold(),
                    format!("{} hosts, {} meetings", queue.hosts.len(), queue.meeting_set.len()).dimmed()
                );
            }
            Ok(())
        }
        QueueSubcommands::Show { id } => {
            let client = connect(&config)?;
            match client.get_queue(id).await? {
                QueueView::Manage(queue) => print_queue(&queue, client.base_url()),
                QueueView::Attending(queue) => {
                    println!("{}", queue.name.bold());
                    println!("  {}", constants::queue_page_url(client.base_url(), queue.id));
                    println!("  {}", "You are not a host of this queue.".bright_yellow());
                }
            }
            Ok(())
        }
        QueueSubcommands::Create { name } => {
            let client = connect(&config)?;
            let queue = client.create_queue(&name).await?;
            info!("Created queue {}", queue.id);
            println!(
                "{} Created '{}' at {}",
                "✓".bright_green().bold(),
                queue.name.bright_green().bold(),
                constants::queue_page_url(client.base_url(), queue.id)
            );
            Ok(())
        }
        QueueSubcommands::Rename { id, name } => {
            let editor = load_editor(&config, id).await?;
            let queue = finish(editor.change_name(&name).await)?;
            println!("{} Renamed queue {} to '{}'", "✓".bright_green().bold(), id, queue.name);
            Ok(())
        }
        QueueSubcommands::Describe { id, description } => {
            let editor = load_editor(&config, id).await?;
            let description = match description {
                Some(d) => d,
                None => {
                    let current = editor.queue().map(|q| q.description).unwrap_or_default();
                    text_input("Description", Some(&current))?
                }
            };
            finish(editor.change_description(&description).await)?;
            println!("{} Updated description of queue {}", "✓".bright_green().bold(), id);
            Ok(())
        }
        QueueSubcommands::Delete { id, yes } => {
            let editor = load_editor(&config, id).await?;
            let confirmation = editor.request_delete_queue();
            let decision = decide(&confirmation, yes)?;
            match editor.resolve(confirmation, decision).await {
                Resolution::Cancelled => println!("Operation cancelled."),
                Resolution::Ran(outcome) => {
                    finish(outcome)?;
                    let next = editor.navigation().map(|n| n.path()).unwrap_or(constants::MANAGE_PATH);
                    println!(
                        "{} Deleted queue {}. Your queues: {}{}",
                        "✓".bright_green().bold(),
                        id,
                        config.server.base_url.trim_end_matches('/'),
                        next
                    );
                }
            }
            Ok(())
        }
        QueueSubcommands::Search { term } => {
            let client = connect(&config)?;
            let queues = client.search_queues(&term).await?;
            if queues.is_empty() {
                println!("  {}", format!("No queues match '{}'", term).bright_yellow());
            }
            for queue in &queues {
                println!("  {:>5}  {}", queue.id.to_string().bright_blue(), queue.name.bold());
            }
            Ok(())
        }
    }
}

pub(crate) fn print_queue(queue: &ManageQueue, base_url: &str) {
    println!("{}", queue.name.bright_cyan().bold());
    println!("  {} {}", "URL:".dimmed(), constants::queue_page_url(base_url, queue.id));
    println!("  {} {}", "Created:".dimmed(), queue.created_at.format("%B %-d, %Y"));
    if !queue.description.is_empty() {
        println!("  {} {}", "Description:".dimmed(), queue.description);
    }

    println!();
    println!("{}", format!("Hosts ({})", queue.hosts.len()).bold());
    for host in &queue.hosts {
        println!("  • {}", host.display_name());
    }

    println!();
    println!("{}", format!("Meetings Up Next ({})", queue.meeting_set.len()).bold());
    if queue.meeting_set.is_empty() {
        println!("  {}", "No meetings".dimmed());
    }
    for meeting in &queue.meeting_set {
        let attendee = meeting
            .primary_attendee()
            .map(|u| u.display_name())
            .unwrap_or_else(|| "(no attendee)".to_string());
        match meeting.backend.join_url() {
            Some(url) => println!("  {:>5}  {}  {}", meeting.id, attendee, url.bright_blue()),
            None => println!("  {:>5}  {}", meeting.id, attendee),
        }
    }
}

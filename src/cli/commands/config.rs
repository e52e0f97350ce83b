use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use log::info;
use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the effective settings
    Show,
    /// Update server settings
    Set {
        /// Base URL of the office-hours site
        #[arg(long)]
        base_url: Option<String>,
        /// Value of the `sessionid` cookie
        #[arg(long)]
        session_id: Option<String>,
        /// Value of the `csrftoken` cookie
        #[arg(long)]
        csrf_token: Option<String>,
    },
}

pub async fn config_command(args: ConfigCommands, path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => show_command(path),
        ConfigSubcommands::Set { base_url, session_id, csrf_token } => {
            set_command(path, base_url, session_id, csrf_token)
        }
    }
}

fn masked(value: &Option<String>) -> ColoredString {
    match value {
        Some(v) if !v.is_empty() => "(set)".bright_green(),
        _ => "(not set)".dimmed(),
    }
}

fn show_command(path: Option<&Path>) -> Result<()> {
    let config = super::load_config(path)?;
    let file = match path {
        Some(p) => p.to_path_buf(),
        None => Config::get_config_path()?,
    };

    println!("{} {}", "Config file:".bold(), file.display());
    println!();
    println!("{}", "[server]".bright_blue().bold());
    println!("  base_url             {}", config.server.base_url);
    println!("  session_id           {}", masked(&config.server.session_id));
    println!("  csrf_token           {}", masked(&config.server.csrf_token));
    println!("  request_timeout_secs {}", config.server.request_timeout_secs);
    println!("{}", "[editor]".bright_blue().bold());
    println!("  poll_interval_ms       {}", config.editor.poll_interval_ms);
    println!("  users_poll_interval_ms {}", config.editor.users_poll_interval_ms);
    println!("  confirm_policy         {}", serde_json::to_string(&config.editor.confirm_policy)?);
    Ok(())
}

fn set_command(
    path: Option<&Path>,
    base_url: Option<String>,
    session_id: Option<String>,
    csrf_token: Option<String>,
) -> Result<()> {
    if base_url.is_none() && session_id.is_none() && csrf_token.is_none() {
        anyhow::bail!("Nothing to set; pass --base-url, --session-id or --csrf-token");
    }

    // Edit the file as stored, without env overrides
    let file: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => Config::get_config_path()?,
    };
    let mut config = Config::load_from(&file)?;

    if let Some(base_url) = base_url {
        info!("Setting base_url to {}", base_url);
        config.server.base_url = base_url;
    }
    if session_id.is_some() {
        config.server.session_id = session_id;
    }
    if csrf_token.is_some() {
        config.server.csrf_token = csrf_token;
    }

    config.save_to(&file)?;
    println!("{} Saved {}", "✓".bright_green().bold(), file.display());
    Ok(())
}

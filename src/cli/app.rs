use super::commands::config::ConfigCommands;
use super::commands::edit::EditArgs;
use super::commands::hosts::HostCommands;
use super::commands::meetings::MeetingCommands;
use super::commands::queues::QueueCommands;
use super::commands::users::UserCommands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "officehours")]
#[command(about = "Manage office-hours queues from the terminal")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Server connection settings
    Config(ConfigCommands),
    /// List, inspect, create and delete queues
    Queues(QueueCommands),
    /// Add or remove queue hosts
    Hosts(HostCommands),
    /// Add or remove meetings on a queue
    Meetings(MeetingCommands),
    /// Look up users
    Users(UserCommands),
    /// Open the interactive queue editor
    Edit(EditArgs),
}

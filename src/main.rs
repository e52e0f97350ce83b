use anyhow::Result;
use clap::Parser;
use log::info;

use officehours::cli::commands::{config, edit, hosts, meetings, queues, users};
use officehours::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("officehours.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    info!("Starting officehours");
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config(args) => config::config_command(args, config_path).await,
        Commands::Queues(args) => queues::queues_command(args, config_path).await,
        Commands::Hosts(args) => hosts::hosts_command(args, config_path).await,
        Commands::Meetings(args) => meetings::meetings_command(args, config_path).await,
        Commands::Users(args) => users::users_command(args, config_path).await,
        Commands::Edit(args) => edit::edit_command(args, config_path).await,
    }
}

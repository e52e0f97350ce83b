use anyhow::Result;
use clap::Args;
use colored::*;
use is_terminal::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use crate::api::{QueueApi, QueueId};
use crate::editor::QueueEditor;
use crate::tui::run_editor;

use super::{connect, load_config};

#[derive(Args)]
pub struct EditArgs {
    /// Queue id
    pub queue: QueueId,
}

pub async fn edit_command(args: EditArgs, config_path: Option<&Path>) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        anyhow::bail!("The queue editor needs an interactive terminal");
    }

    let config = load_config(config_path)?;
    let client = connect(&config)?;
    let base_url = client.base_url().to_string();
    let api: Arc<dyn QueueApi> = Arc::new(client);
    let editor = QueueEditor::new(api, args.queue, config.editor_settings());

    if let Some(navigation) = run_editor(editor, base_url.clone()).await? {
        println!(
            "{} Queue {} deleted. Your queues: {}{}",
            "✓".bright_green().bold(),
            args.queue,
            base_url,
            navigation.path()
        );
    }
    Ok(())
}

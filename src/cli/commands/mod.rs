pub mod config;
pub mod edit;
pub mod hosts;
pub mod meetings;
pub mod queues;
pub mod users;

use anyhow::Result;
use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::api::{OfficeHoursClient, QueueApi, QueueId};
use crate::config::Config;
use crate::editor::{QueueEditor, RunOutcome};

/// Load config from `path` or the default location, with env overrides
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env_overrides();
            Ok(config)
        }
        None => Config::load(),
    }
}

pub(crate) fn connect(config: &Config) -> Result<OfficeHoursClient> {
    debug!("Connecting to {}", config.server.base_url);
    config.build_client()
}

/// Editor for one-shot commands: fetched once, never polled
pub(crate) async fn load_editor(config: &Config, queue_id: QueueId) -> Result<QueueEditor> {
    let client: Arc<dyn QueueApi> = Arc::new(connect(config)?);
    let editor = QueueEditor::new(client, queue_id, config.editor_settings());
    finish(editor.load().await)?;
    Ok(editor)
}

/// Turn a controller outcome into a command result
pub(crate) fn finish<T>(outcome: RunOutcome<T>) -> Result<T> {
    match outcome {
        RunOutcome::Succeeded(value) => Ok(value),
        RunOutcome::Failed(e) => Err(e.into()),
        RunOutcome::Rejected => anyhow::bail!("Another change is still in progress"),
    }
}

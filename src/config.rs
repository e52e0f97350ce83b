use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ClientConfig, OfficeHoursClient, PageContext};
use crate::editor::{ConfirmPolicy, EditorSettings};

pub const BASE_URL_VAR: &str = "OFFICEHOURS_BASE_URL";
pub const SESSION_ID_VAR: &str = "OFFICEHOURS_SESSION_ID";
pub const CSRF_TOKEN_VAR: &str = "OFFICEHOURS_CSRF_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// 0 disables the request deadline
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_id: None,
            csrf_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_users_poll_interval_ms")]
    pub users_poll_interval_ms: u64,
    #[serde(default)]
    pub confirm_policy: ConfirmPolicy,
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_users_poll_interval_ms() -> u64 {
    6000
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            users_poll_interval_ms: default_users_poll_interval_ms(),
            confirm_policy: ConfirmPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("officehours")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".officehours")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", path);

        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Config saved successfully");
        Ok(())
    }

    /// Values from the process environment (and `.env`) win over the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_VAR) {
            debug!("{} overrides base_url", BASE_URL_VAR);
            self.server.base_url = base_url;
        }
        if let Ok(session_id) = std::env::var(SESSION_ID_VAR) {
            self.server.session_id = Some(session_id);
        }
        if let Ok(csrf_token) = std::env::var(CSRF_TOKEN_VAR) {
            self.server.csrf_token = Some(csrf_token);
        }
    }

    pub fn page_context(&self) -> PageContext {
        PageContext::new(self.server.csrf_token.clone(), self.server.session_id.clone())
    }

    pub fn client_config(&self) -> ClientConfig {
        let request_timeout = match self.server.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        ClientConfig { request_timeout, ..ClientConfig::default() }
    }

    pub fn build_client(&self) -> Result<OfficeHoursClient> {
        OfficeHoursClient::with_config(&self.server.base_url, self.page_context(), self.client_config())
            .context("Failed to create HTTP client")
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            poll_interval: Duration::from_millis(self.editor.poll_interval_ms),
            users_poll_interval: Duration::from_millis(self.editor.users_poll_interval_ms),
            confirm_policy: self.editor.confirm_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.editor_settings(), EditorSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.server.base_url = "https://oh.example.edu".into();
        config.server.csrf_token = Some("tok".into());
        config.editor.confirm_policy = ConfirmPolicy::ArmOnOpen;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.editor_settings().confirm_policy, ConfirmPolicy::ArmOnOpen);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[editor]\npoll_interval_ms = 500\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.server, ServerSettings::default());
        assert_eq!(config.editor_settings().poll_interval, Duration::from_millis(500));
        assert_eq!(config.editor.users_poll_interval_ms, 6000);
    }

    #[test]
    fn test_unknown_confirm_policy_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[editor]\nconfirm_policy = \"never\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("never"));
    }

    #[test]
    fn test_confirm_policy_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[editor]\nconfirm_policy = \"arm-on-open\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.editor.confirm_policy, ConfirmPolicy::ArmOnOpen);
        assert_eq!(config.editor_settings().confirm_policy, ConfirmPolicy::ArmOnOpen);
        assert!(toml::to_string(&config).unwrap().contains("confirm_policy = \"arm-on-open\""));
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let mut config = Config::default();
        assert_eq!(config.client_config().request_timeout, Some(Duration::from_secs(30)));

        config.server.request_timeout_secs = 0;
        assert_eq!(config.client_config().request_timeout, None);
    }
}

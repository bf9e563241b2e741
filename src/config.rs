//! Configuration file support for moonlight-chat
//!
//! Loads config from ~/.moonlight/config.toml. Every field is optional;
//! values given on the command line or in the environment win.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "dev_user";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Seed message shown as the first assistant entry of every session
pub const DEFAULT_GREETING: &str = "안녕하세요, 주인님. 무엇을 도와드릴까요? 🌙";

/// Assistant message appended when a request fails for any reason
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "죄송합니다, 연결에 문제가 있습니다. 서버가 실행 중인지 확인해주세요.";

/// Configuration for moonlight-chat
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend base URL (the chat endpoint lives at `{base_url}/api/chat`)
    pub base_url: Option<String>,

    /// User identifier sent with every request
    pub user_id: Option<String>,

    /// Whether the backend may invoke tools
    pub enable_tools: Option<bool>,

    /// Request timeout in seconds, 0 disables it
    pub request_timeout_secs: Option<u64>,

    /// Override for the seed greeting
    pub greeting: Option<String>,

    /// Override for the failure message
    pub fallback_message: Option<String>,
}

impl Config {
    /// Load config from ~/.moonlight/config.toml
    pub fn load() -> Self {
        let path = config_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {}", e);
                eprintln!("Warning: {}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Fully resolved settings for one chat session
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub base_url: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub enable_tools: bool,
    /// `None` means wait forever
    pub request_timeout: Option<Duration>,
    pub greeting: String,
    pub fallback_message: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            session_id: None,
            enable_tools: true,
            request_timeout: timeout_from_secs(DEFAULT_TIMEOUT_SECS),
            greeting: DEFAULT_GREETING.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl ChatSettings {
    /// Fill every field the caller left unset from the config file, then
    /// from built-in defaults
    pub fn resolve(
        config: Config,
        base_url: Option<String>,
        user_id: Option<String>,
        disable_tools: bool,
        timeout_secs: Option<u64>,
        session_id: Option<String>,
    ) -> Self {
        let defaults = Self::default();

        let base_url = base_url
            .or(config.base_url)
            .unwrap_or(defaults.base_url);

        let user_id = user_id
            .or(config.user_id)
            .unwrap_or(defaults.user_id);

        let enable_tools = !disable_tools && config.enable_tools.unwrap_or(defaults.enable_tools);

        let request_timeout = match timeout_secs.or(config.request_timeout_secs) {
            Some(secs) => timeout_from_secs(secs),
            None => defaults.request_timeout,
        };

        Self {
            base_url,
            user_id,
            session_id,
            enable_tools,
            request_timeout,
            greeting: config.greeting.unwrap_or(defaults.greeting),
            fallback_message: config.fallback_message.unwrap_or(defaults.fallback_message),
        }
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Directory holding config, .env and history
pub fn moonlight_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".moonlight")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    moonlight_dir().join("config.toml")
}

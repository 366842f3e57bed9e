use anyhow::Result;
use serde::{Deserialize, Serialize};
use shared::{default_socket_path, TypingEcho};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::describe::messages::{EnglishMessages, OverlayCatalog, UnknownMessageKey};
use crate::describe::tracker::DEFAULT_MAX_SHORT_PHRASE_LEN;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub echo: EchoConfig,
    /// Replacement phrases keyed by message name, e.g. `selected`.
    pub messages: HashMap<String, String>,
    pub output: OutputConfig,
    pub rate_limit: RateLimitConfig,
    pub server: ServerConfig,
    pub timeouts: TimeoutsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EchoConfig {
    #[serde(default)]
    pub typing_echo: TypingEcho,
    #[serde(default = "default_speak_insertions")]
    pub speak_insertions: bool,
    #[serde(default = "default_max_short_phrase_len")]
    pub max_short_phrase_len: usize,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            typing_echo: TypingEcho::default(),
            speak_insertions: default_speak_insertions(),
            max_short_phrase_len: default_max_short_phrase_len(),
        }
    }
}

fn default_speak_insertions() -> bool {
    true
}

fn default_max_short_phrase_len() -> usize {
    DEFAULT_MAX_SHORT_PHRASE_LEN
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_log_utterances")]
    pub log_utterances: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_utterances: default_log_utterances(),
        }
    }
}

fn default_log_utterances() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RateLimitConfig {
    #[serde(default = "default_changes_per_second")]
    pub changes_per_second: u32,
    #[serde(default = "default_burst_capacity")]
    pub burst_capacity: u32,
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            changes_per_second: default_changes_per_second(),
            burst_capacity: default_burst_capacity(),
            enabled: default_rate_limit_enabled(),
        }
    }
}

fn default_changes_per_second() -> u32 {
    50
}

fn default_burst_capacity() -> u32 {
    100
}

fn default_rate_limit_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(default_socket_path)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TimeoutsConfig {
    #[serde(default = "default_socket_operation_timeout")]
    pub socket_operation_timeout_seconds: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            socket_operation_timeout_seconds: default_socket_operation_timeout(),
        }
    }
}

fn default_socket_operation_timeout() -> u64 {
    10
}

impl Config {
    pub fn message_catalog(&self) -> Result<OverlayCatalog<EnglishMessages>, UnknownMessageKey> {
        OverlayCatalog::new(EnglishMessages, &self.messages)
    }
}

pub fn load_config() -> Result<Config> {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::warn!("No config directory available, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    tracing::info!("Loading config from {:?}", config_path);
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

    config
        .message_catalog()
        .map_err(|e| anyhow::anyhow!("Invalid [messages] table: {}", e))?;

    tracing::info!("Config loaded successfully");
    Ok(config)
}

fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("keyecho").join("config.toml"))
}

//! Configuration loading, validation, and management for Voyager.
//!
//! Loads configuration from `~/.voyager/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.voyager/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the generation backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Backend provider name (groq, openai, openrouter, ollama, ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model used for every backend call
    #[serde(default = "default_model")]
    pub model: String,

    /// Max tokens per generated response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Per-request timeout for backend calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Sampling settings per backend call
    #[serde(default)]
    pub generation: GenerationConfig,

    /// History window and persona
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Data lookups
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Trace export
    #[serde(default)]
    pub trace: TraceConfig,
}

fn default_provider() -> String {
    "groq".into()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("generation", &self.generation)
            .field("conversation", &self.conversation)
            .field("tools", &self.tools)
            .field("trace", &self.trace)
            .finish()
    }
}

/// Sampling temperatures for the three backend calls of a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Intent classification (deterministic)
    #[serde(default = "default_classify_temperature")]
    pub classify_temperature: f32,

    /// Streamed answer generation
    #[serde(default = "default_response_temperature")]
    pub response_temperature: f32,

    /// Verification pass
    #[serde(default = "default_verify_temperature")]
    pub verify_temperature: f32,
}

fn default_classify_temperature() -> f32 {
    0.0
}
fn default_response_temperature() -> f32 {
    0.4
}
fn default_verify_temperature() -> f32 {
    0.1
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            classify_temperature: default_classify_temperature(),
            response_temperature: default_response_temperature(),
            verify_temperature: default_verify_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Sliding window size, in exchanges (one user turn + one assistant
    /// turn). The prompt carries at most `2 * history_window` history turns.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Replace the built-in persona with the contents of this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_file: Option<String>,
}

fn default_history_window() -> usize {
    8
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            persona_file: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_true")]
    pub weather: bool,

    #[serde(default = "default_true")]
    pub attractions: bool,

    /// OpenWeatherMap key. Without it the weather lookup returns mock data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather_api_key: Option<String>,

    #[serde(default = "default_openweather_url")]
    pub openweather_url: String,
}

fn default_openweather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".into()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            weather: true,
            attractions: true,
            openweather_api_key: None,
            openweather_url: default_openweather_url(),
        }
    }
}

impl std::fmt::Debug for ToolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsConfig")
            .field("weather", &self.weather)
            .field("attractions", &self.attractions)
            .field("openweather_api_key", &redact(&self.openweather_api_key))
            .field("openweather_url", &self.openweather_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Export each conversation's event log when it ends
    #[serde(default)]
    pub enabled: bool,

    /// Output directory (default: ~/.voyager/traces)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.voyager/config.toml).
    ///
    /// Environment variables override the file:
    /// - `VOYAGER_API_KEY`, then `GROQ_TRAVEL_API_KEY`, then `GROQ_API_KEY`
    /// - `VOYAGER_PROVIDER`, `VOYAGER_MODEL`
    /// - `OPENWEATHER_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("VOYAGER_API_KEY")
                .or_else(|| lookup("GROQ_TRAVEL_API_KEY"))
                .or_else(|| lookup("GROQ_API_KEY"));
        }

        if let Some(provider) = lookup("VOYAGER_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("VOYAGER_MODEL") {
            self.model = model;
        }

        if self.tools.openweather_api_key.is_none() {
            self.tools.openweather_api_key = lookup("OPENWEATHER_API_KEY");
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".voyager")
    }

    /// Directory that receives exported traces.
    pub fn trace_dir(&self) -> PathBuf {
        self.trace
            .dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::config_dir().join("traces"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temps = [
            ("classify_temperature", self.generation.classify_temperature),
            ("response_temperature", self.generation.response_temperature),
            ("verify_temperature", self.generation.verify_temperature),
        ];
        for (name, value) in temps {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "generation.{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.conversation.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "conversation.history_window must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            max_tokens: None,
            request_timeout_secs: default_request_timeout_secs(),
            generation: GenerationConfig::default(),
            conversation: ConversationConfig::default(),
            tools: ToolsConfig::default(),
            trace: TraceConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Editor behavior settings (tab stop, line numbers, undo history, etc.)
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Editor behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Width of a tab stop in render columns
    #[serde(default = "default_tab_stop")]
    pub tab_stop: usize,

    /// Show the line-number gutter on start
    #[serde(default)]
    pub line_numbers: bool,

    /// Extra Ctrl-Q presses needed to quit with unsaved changes
    #[serde(default = "default_quit_confirm_times")]
    pub quit_confirm_times: u32,

    /// Seconds a status message stays on the message bar
    #[serde(default = "default_message_timeout_secs")]
    pub message_timeout_secs: u64,

    /// Maximum number of undo steps kept; unbounded when absent
    #[serde(default)]
    pub undo_limit: Option<usize>,
}

fn default_tab_stop() -> usize {
    4
}

fn default_quit_confirm_times() -> u32 {
    3
}

fn default_message_timeout_secs() -> u64 {
    5
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: default_tab_stop(),
            line_numbers: false,
            quit_confirm_times: default_quit_confirm_times(),
            message_timeout_secs: default_message_timeout_secs(),
            undo_limit: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("quill").join("config.json"))
    }

    /// Load configuration from the default location, falling back to defaults if
    /// it is missing or invalid
    pub fn load_or_default() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                match Self::load_from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load config from {}: {}, using defaults",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }
        Self::default()
    }

    /// Load and validate configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.tab_stop == 0 {
            return Err(ConfigError::ValidationError(
                "tab_stop must be greater than 0".to_string(),
            ));
        }

        if self.editor.undo_limit == Some(0) {
            return Err(ConfigError::ValidationError(
                "undo_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

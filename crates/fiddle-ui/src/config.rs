//! Page configuration
//!
//! All options are booleans so they can be bound to checkboxes carrying
//! `data-config="<key>"`. Keys use the camelCase names the page markup uses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Page options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FiddleConfig {
    /// Scroll the output area to the bottom after each line
    pub auto_scroll_output: bool,
    /// Clear the output area before each command's first output
    pub auto_clear_output: bool,
    /// Also send every output line to the console log
    pub echo_to_console: bool,
    /// Show input and output side by side
    pub side_by_side: bool,
    /// Swap the input and output areas
    pub swap_in_out: bool,
}

impl Default for FiddleConfig {
    fn default() -> Self {
        Self {
            auto_scroll_output: true,
            auto_clear_output: false,
            echo_to_console: false,
            side_by_side: false,
            swap_in_out: false,
        }
    }
}

impl FiddleConfig {
    /// Every key accepted by [`get`](Self::get) and [`set`](Self::set)
    pub const KEYS: [&'static str; 5] = [
        "autoScrollOutput",
        "autoClearOutput",
        "echoToConsole",
        "sideBySide",
        "swapInOut",
    ];

    /// Parse a (possibly partial) JSON object; missing keys keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    fn slot(&mut self, key: &str) -> Result<&mut bool, ConfigError> {
        match key {
            "autoScrollOutput" => Ok(&mut self.auto_scroll_output),
            "autoClearOutput" => Ok(&mut self.auto_clear_output),
            "echoToConsole" => Ok(&mut self.echo_to_console),
            "sideBySide" => Ok(&mut self.side_by_side),
            "swapInOut" => Ok(&mut self.swap_in_out),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Read an option by key
    pub fn get(&self, key: &str) -> Result<bool, ConfigError> {
        match key {
            "autoScrollOutput" => Ok(self.auto_scroll_output),
            "autoClearOutput" => Ok(self.auto_clear_output),
            "echoToConsole" => Ok(self.echo_to_console),
            "sideBySide" => Ok(self.side_by_side),
            "swapInOut" => Ok(self.swap_in_out),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Write an option by key
    pub fn set(&mut self, key: &str, value: bool) -> Result<(), ConfigError> {
        *self.slot(key)? = value;
        Ok(())
    }
}

/// Configuration errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Key is not a known option
    UnknownKey(String),
    /// JSON could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownKey(key) => write!(f, "Unknown config key: {}", key),
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

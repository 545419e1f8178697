use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Directory created under the user's home when nothing else is configured.
pub const DEFAULT_HOME_DIR_NAME: &str = ".budget_planner";

/// User-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the key-value store lives. Defaults to `~/.budget_planner`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_currency_label")]
    pub currency_label: String,
    #[serde(default = "Config::default_grouping_separator")]
    pub grouping_separator: char,
    #[serde(default = "Config::default_decimal_separator")]
    pub decimal_separator: char,
    /// Offer the showcase items when the store has never held a ledger.
    #[serde(default = "Config::default_seed_first_run")]
    pub seed_first_run: bool,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// `tracing` filter directive, e.g. `budget_planner=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            currency_label: Self::default_currency_label(),
            grouping_separator: Self::default_grouping_separator(),
            decimal_separator: Self::default_decimal_separator(),
            seed_first_run: Self::default_seed_first_run(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            log_filter: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`], in display order.
    pub const KEYS: [&'static str; 7] = [
        "data_dir",
        "currency_label",
        "grouping_separator",
        "decimal_separator",
        "seed_first_run",
        "ui_color_enabled",
        "log_filter",
    ];

    fn default_currency_label() -> String {
        "Rp".into()
    }

    fn default_grouping_separator() -> char {
        '.'
    }

    fn default_decimal_separator() -> char {
        ','
    }

    fn default_seed_first_run() -> bool {
        true
    }

    fn default_ui_color_enabled() -> bool {
        true
    }

    /// `~/.budget_planner`, or a relative `.budget_planner` when no home exists.
    pub fn default_home() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_HOME_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_DIR_NAME))
    }

    /// Configured data directory, falling back to `home`.
    pub fn resolve_data_dir(&self, home: &std::path::Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| home.to_path_buf())
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "currency_label" => self.currency_label.clone(),
            "grouping_separator" => self.grouping_separator.to_string(),
            "decimal_separator" => self.decimal_separator.to_string(),
            "seed_first_run" => self.seed_first_run.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "log_filter" => self.log_filter.clone().unwrap_or_else(|| "(default)".into()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Updates one field from text. `default` resets optional fields.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        match key {
            "data_dir" => {
                self.data_dir = optional(trimmed).map(PathBuf::from);
            }
            "currency_label" => self.currency_label = trimmed.to_string(),
            "grouping_separator" => {
                self.grouping_separator = separator(key, value, self.decimal_separator)?;
            }
            "decimal_separator" => {
                self.decimal_separator = separator(key, value, self.grouping_separator)?;
            }
            "seed_first_run" => self.seed_first_run = boolean(key, trimmed)?,
            "ui_color_enabled" => self.ui_color_enabled = boolean(key, trimmed)?,
            "log_filter" => self.log_filter = optional(trimmed).map(str::to_string),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn optional(value: &str) -> Option<&str> {
    match value {
        "" | "default" | "none" => None,
        other => Some(other),
    }
}

/// A single character that differs from the other separator.
fn separator(key: &str, value: &str, other: char) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch == other => {
            Err(invalid(key, value, "already used by the other separator"))
        }
        (Some(ch), None) => Ok(ch),
        _ => Err(invalid(key, value, "expected a single character")),
    }
}

fn boolean(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

//! Configuration types for clickup-sheets-sync

use crate::error::{Error, Result};
use crate::flatten::custom_fields::{CustomFieldRule, default_rules};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the ClickUp API token
pub const ENV_CLICKUP_API_KEY: &str = "CLICKUP_API_KEY";
/// Environment variable overriding the ClickUp team id
pub const ENV_CLICKUP_TEAM_ID: &str = "CLICKUP_TEAM_ID";
/// Environment variable holding the Google Sheets OAuth access token
pub const ENV_SHEETS_ACCESS_TOKEN: &str = "GOOGLE_SHEETS_ACCESS_TOKEN";

/// ClickUp API connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ClickUpConfig {
    /// Static API token sent as the `Authorization` header on every request
    #[serde(default)]
    pub api_token: String,

    /// API base URL (default: "https://api.clickup.com/api/v2")
    #[serde(default = "default_clickup_base_url")]
    pub base_url: String,

    /// Team (workspace) whose spaces are walked
    #[serde(default = "default_team_id")]
    pub team_id: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for ClickUpConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_clickup_base_url(),
            team_id: default_team_id(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for ClickUpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickUpConfig")
            .field("api_token", &redact(&self.api_token))
            .field("base_url", &self.base_url)
            .field("team_id", &self.team_id)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Retry policy for ClickUp requests
///
/// Backoff is purely exponential: the n-th rate-limit sleep is
/// `initial_delay * backoff_multiplier^(n-1)`. There is no jitter and no cap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts per request, including the first (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Sleep after the first rate-limited response (default: 2 seconds)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Multiplier applied to the sleep after each rate-limited response (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Spreadsheet destinations and Sheets API access
#[derive(Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Spreadsheet receiving the task detail dataset
    #[serde(default = "default_task_spreadsheet_id")]
    pub task_spreadsheet_id: String,

    /// Spreadsheet receiving the time entry dataset
    #[serde(default = "default_time_spreadsheet_id")]
    pub time_spreadsheet_id: String,

    /// Sheets API base URL (default: "https://sheets.googleapis.com/v4")
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,

    /// OAuth access token with the spreadsheets scope
    #[serde(default)]
    pub access_token: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            task_spreadsheet_id: default_task_spreadsheet_id(),
            time_spreadsheet_id: default_time_spreadsheet_id(),
            sheets_base_url: default_sheets_base_url(),
            access_token: String::new(),
        }
    }
}

impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("task_spreadsheet_id", &self.task_spreadsheet_id)
            .field("time_spreadsheet_id", &self.time_spreadsheet_id)
            .field("sheets_base_url", &self.sheets_base_url)
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}

/// Hierarchy traversal options
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Also enumerate lists that live directly under a space (default: false)
    #[serde(default)]
    pub include_folderless_lists: bool,

    /// Drop repeated list ids before enumerating tasks (default: false)
    ///
    /// When false, a task reachable through a repeated list id is listed twice.
    #[serde(default)]
    pub dedupe_list_ids: bool,
}

/// Task detail flattening options
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlattenConfig {
    /// Emit one row with empty assignee columns for tasks without assignees (default: false)
    ///
    /// When false, unassigned tasks produce no detail rows.
    #[serde(default)]
    pub keep_unassigned_tasks: bool,

    /// Custom field extraction rules, evaluated in order
    #[serde(default = "default_rules")]
    pub custom_fields: Vec<CustomFieldRule>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            keep_unassigned_tasks: false,
            custom_fields: default_rules(),
        }
    }
}

/// Main configuration for a sync run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// ClickUp API settings
    #[serde(default)]
    pub clickup: ClickUpConfig,

    /// Retry policy for ClickUp requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Export destinations
    #[serde(default)]
    pub export: ExportConfig,

    /// Hierarchy traversal options
    #[serde(default)]
    pub walk: WalkConfig,

    /// Task detail flattening options
    #[serde(default)]
    pub flatten: FlattenConfig,

    /// Zone used to render timestamps and interpret date input (default: UTC)
    #[serde(default = "default_time_zone")]
    pub display_time_zone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clickup: ClickUpConfig::default(),
            retry: RetryConfig::default(),
            export: ExportConfig::default(),
            walk: WalkConfig::default(),
            flatten: FlattenConfig::default(),
            display_time_zone: default_time_zone(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then apply environment overrides
    ///
    /// Missing keys fall back to their defaults. Environment variables
    /// (`CLICKUP_API_KEY`, `CLICKUP_TEAM_ID`, `GOOGLE_SHEETS_ACCESS_TOKEN`) take
    /// precedence over file values when set and non-empty.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            message: format!("invalid config file: {e}"),
            key: None,
        })
    }

    fn apply_env(&mut self) {
        if let Some(token) = non_empty_env(ENV_CLICKUP_API_KEY) {
            self.clickup.api_token = token;
        }
        if let Some(team_id) = non_empty_env(ENV_CLICKUP_TEAM_ID) {
            self.clickup.team_id = team_id;
        }
        if let Some(token) = non_empty_env(ENV_SHEETS_ACCESS_TOKEN) {
            self.export.access_token = token;
        }
    }

    /// Check the settings a run cannot proceed without
    pub fn validate(&self) -> Result<()> {
        if self.clickup.api_token.trim().is_empty() {
            return Err(Error::Config {
                message: format!("ClickUp API token is not set (use {ENV_CLICKUP_API_KEY})"),
                key: Some("clickup.api_token".into()),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config {
                message: "max_attempts must be at least 1".into(),
                key: Some("retry.max_attempts".into()),
            });
        }
        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(Error::Config {
                message: format!("backoff_multiplier must be finite and >= 1.0, got {multiplier}"),
                key: Some("retry.backoff_multiplier".into()),
            });
        }
        if let Some(rule) = self
            .flatten
            .custom_fields
            .iter()
            .find(|rule| rule.column.trim().is_empty())
        {
            return Err(Error::Config {
                message: format!("custom field rule {:?} has an empty column name", rule.matcher),
                key: Some("flatten.custom_fields".into()),
            });
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

fn default_clickup_base_url() -> String {
    "https://api.clickup.com/api/v2".into()
}

fn default_team_id() -> String {
    "9013069666".into()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_task_spreadsheet_id() -> String {
    "1cBmj0EoxdmQbhdb3LWj1cmso0-pUEX9h6x3nk4fGZC4".into()
}

fn default_time_spreadsheet_id() -> String {
    "1eZLzEq0KB24GzTxqjFTZMzN4Z7SZSdhgUrU0fdA5Xl4".into()
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com/v4".into()
}

fn default_time_zone() -> Tz {
    Tz::UTC
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

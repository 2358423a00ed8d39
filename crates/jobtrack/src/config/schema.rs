use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::record::DEFAULT_POSITION;
use crate::secrets::SecretRef;
use crate::table::WriteMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            output: OutputConfig::default(),
            extraction: ExtractionConfig::default(),
            mail: MailConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default)]
    pub mode: WriteMode,
}

fn default_output_path() -> String {
    "job_applications.xlsx".to_string()
}

fn default_sheet_name() -> String {
    "Applications".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            sheet_name: default_sheet_name(),
            mode: WriteMode::default(),
        }
    }
}

/// Zone used to turn a receipt timestamp into a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateZone {
    #[default]
    Local,
    Utc,
}

impl DateZone {
    /// Calendar date of a millisecond timestamp in this zone, `None` when the
    /// timestamp is out of range.
    pub fn date_of(self, timestamp_ms: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)?;
        Some(match self {
            DateZone::Utc => utc.date_naive(),
            DateZone::Local => utc.with_timezone(&Local).date_naive(),
        })
    }

    pub fn today(self) -> NaiveDate {
        match self {
            DateZone::Utc => Utc::now().date_naive(),
            DateZone::Local => Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_position")]
    pub default_position: String,
    #[serde(default)]
    pub timezone: DateZone,
    /// Extra phrase rules, checked before the built-in ones.
    #[serde(default)]
    pub position_rules: Vec<PositionRuleConfig>,
}

fn default_position() -> String {
    DEFAULT_POSITION.to_string()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_position: default_position(),
            timezone: DateZone::default(),
            position_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRuleConfig {
    /// Every phrase must appear (case-insensitive) for the rule to fire.
    pub all_of: Vec<String>,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub imap: Option<ImapConfig>,
    #[serde(default)]
    pub eml_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImapConfig {
    pub host: String,
    #[serde(default = "default_imap_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: SecretRef,
    #[serde(default = "default_mailbox")]
    pub mailbox: String,
    /// Forces Gmail `X-GM-RAW` search. Defaults to on for gmail hosts.
    #[serde(default)]
    pub gmail_raw_search: Option<bool>,
}

fn default_imap_port() -> u16 {
    993
}

fn default_mailbox() -> String {
    "INBOX".to_string()
}

impl ImapConfig {
    pub fn uses_gmail_search(&self) -> bool {
        self.gmail_raw_search.unwrap_or_else(|| {
            let host = self.host.to_lowercase();
            host.ends_with("gmail.com") || host.ends_with("googlemail.com")
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key")]
    pub api_key: SecretRef,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-3-sonnet-20240229".to_string()
}

fn default_api_key() -> SecretRef {
    SecretRef::from_env_var("ANTHROPIC_API_KEY")
}

fn default_max_tokens() -> u32 {
    100
}

fn default_temperature() -> f64 {
    0.3
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: default_api_key(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

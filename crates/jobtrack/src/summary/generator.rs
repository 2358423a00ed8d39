//! Prompt construction, response cleanup and the fallback templates.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::SummarizerConfig;
use crate::record::{ApplicationRecord, ApplicationStatus, ParsedApplication};

use super::{AnthropicSummarizer, SummaryService};

pub const MAX_SUMMARY_WORDS: usize = 30;

const MAX_CONTENT_CHARS: usize = 2000;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?@()-]").unwrap());

/// Produces the `notes` value for a record. Never fails: without a service,
/// or when the service errors or returns nothing usable, the status
/// template is used.
#[derive(Clone, Default)]
pub struct SummaryGenerator {
    service: Option<Arc<dyn SummaryService>>,
}

impl SummaryGenerator {
    pub fn new(service: Option<Arc<dyn SummaryService>>) -> Self {
        Self { service }
    }

    /// Generator that only uses the templates.
    pub fn disabled() -> Self {
        Self { service: None }
    }

    /// Uses the messages API when enabled and an API key resolves;
    /// otherwise every summary comes from the templates.
    pub fn from_config(config: &SummarizerConfig) -> Self {
        if !config.enabled {
            info!("Summaries disabled, using templates");
            return Self::disabled();
        }

        match AnthropicSummarizer::from_config(config) {
            Ok(summarizer) => {
                debug!(model = %summarizer.model(), "Summarizer ready");
                Self::new(Some(Arc::new(summarizer)))
            }
            Err(e) => {
                warn!("Summarizer unavailable, using templates: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    pub async fn summarize(&self, parsed: &ParsedApplication) -> String {
        let record = &parsed.record;
        let Some(service) = &self.service else {
            return fallback_summary(record);
        };

        let prompt = build_prompt(record, &parsed.raw_excerpt);
        match service.complete(&prompt).await {
            Ok(response) => match clean_summary(&response) {
                Some(summary) => summary,
                None => {
                    debug!(company = %record.company, "Empty summary, using fallback");
                    fallback_summary(record)
                }
            },
            Err(e) => {
                warn!(company = %record.company, "Summary request failed: {}", e);
                fallback_summary(record)
            }
        }
    }
}

pub fn build_prompt(record: &ApplicationRecord, excerpt: &str) -> String {
    format!(
        "Please create a very concise summary (maximum {max} words) of this job application email.\n\
         \n\
         Company: {company}\n\
         Position: {position}\n\
         Status: {status}\n\
         \n\
         Email content:\n\
         {content}\n\
         \n\
         Focus on:\n\
         - Key application details\n\
         - Current status\n\
         - Any important next steps\n\
         - Platform/source used\n\
         \n\
         Summary (max {max} words):\n",
        max = MAX_SUMMARY_WORDS,
        company = record.company,
        position = record.position,
        status = record.status,
        content = clean_content(excerpt),
    )
}

/// Collapses whitespace, drops unusual characters and caps the length.
pub fn clean_content(excerpt: &str) -> String {
    let collapsed = RE_WHITESPACE.replace_all(excerpt, " ");
    RE_DISALLOWED
        .replace_all(&collapsed, "")
        .chars()
        .take(MAX_CONTENT_CHARS)
        .collect()
}

/// Trims quotes, keeps at most [`MAX_SUMMARY_WORDS`] words and ensures
/// terminal punctuation. `None` when nothing is left.
pub fn clean_summary(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    let words: Vec<&str> = trimmed.split_whitespace().take(MAX_SUMMARY_WORDS).collect();
    if words.is_empty() {
        return None;
    }

    let mut summary = words.join(" ");
    if !summary.ends_with(['.', '!', '?']) {
        summary.push('.');
    }
    Some(summary)
}

/// One templated sentence per status.
pub fn fallback_summary(record: &ApplicationRecord) -> String {
    let company = &record.company;
    let position = &record.position;
    let source = if record.source.trim().is_empty() {
        "email"
    } else {
        record.source.as_str()
    };

    match record.status {
        ApplicationStatus::Applied => format!(
            "Applied to {} via {}. Application confirmation received.",
            company, source
        ),
        ApplicationStatus::Rejected => format!(
            "{} application status: Not selected for {}.",
            company, position
        ),
        ApplicationStatus::Interview => {
            format!("{} interview scheduled for {}.", company, position)
        }
        ApplicationStatus::Offer => {
            format!("Job offer received from {} for {}.", company, position)
        }
        other => format!(
            "{} application via {} - {}.",
            company,
            source,
            other.as_str().to_lowercase()
        ),
    }
}

//! Field extraction from a single message.
//!
//! Each sub-extractor is a total function returning `Option`; `None` means
//! "not found". Defaults and sentinels are applied later by the
//! [`RecordBuilder`](crate::builder::RecordBuilder).

pub mod company;
pub mod job_id;
pub mod link;
pub mod location;
pub mod position;
pub mod source;
pub mod status;
pub mod text;

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::ExtractionConfig;
use crate::email::RawMessage;
use crate::record::ApplicationStatus;

pub use position::PositionRule;
pub use text::MessageText;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub source: Option<String>,
    pub location: Option<String>,
    pub job_id: Option<String>,
    pub status_link: Option<String>,
}

/// An extractor panicked on a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Extraction failed for message {message_id}: {reason}")]
pub struct ExtractionFailure {
    pub message_id: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct FieldExtractor {
    position_rules: Vec<PositionRule>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    /// Extractor with the built-in position rules only.
    pub fn new() -> Self {
        Self {
            position_rules: position::builtin_rules(),
        }
    }

    /// Extractor whose extra rules are checked before the built-in ones.
    pub fn with_extra_rules(extra: impl IntoIterator<Item = PositionRule>) -> Self {
        let mut position_rules: Vec<PositionRule> = extra.into_iter().collect();
        position_rules.extend(position::builtin_rules());
        Self { position_rules }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::with_extra_rules(config.position_rules.iter().map(PositionRule::from))
    }

    pub fn extract(&self, message: &RawMessage) -> ExtractedFields {
        let text = MessageText::new(message);
        let subject_body = text.subject_body();

        ExtractedFields {
            company: company::extract_company(&text),
            position: position::extract_position(&text, &self.position_rules),
            status: status::extract_status(&subject_body),
            source: source::extract_source(text.sender, text.body),
            location: location::extract_location(&subject_body),
            job_id: job_id::extract_job_id(&text.all()),
            status_link: link::extract_status_link(&subject_body),
        }
    }
}

/// Runs [`FieldExtractor::extract`], turning a panic into an
/// [`ExtractionFailure`] so one malformed message cannot abort a batch.
pub fn extract_guarded(
    extractor: &FieldExtractor,
    message: &RawMessage,
) -> Result<ExtractedFields, ExtractionFailure> {
    catch_unwind(AssertUnwindSafe(|| extractor.extract(message))).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "extractor panicked".to_string());
        ExtractionFailure {
            message_id: message.id.clone(),
            reason,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::Headers;

    fn message(from: &str, subject: &str, snippet: &str, body: &str) -> RawMessage {
        RawMessage {
            id: "m1".to_string(),
            thread_id: "t1".to_string(),
            headers: [("From", from), ("Subject", subject)]
                .into_iter()
                .collect::<Headers>(),
            snippet: snippet.to_string(),
            body: body.to_string(),
            received_at_ms: 0,
        }
    }

    #[test]
    fn test_extracts_all_fields() {
        let msg = message(
            "Stryker <recruiting@stryker.com>",
            "2026 Summer Intern - Software Engineering Campus 26",
            "We received your application for R549794",
            "Location: Kalamazoo, MI\n\
             Check status at https://stryker.wd1.myworkdayjobs.com/en-US/StrykerCareers/job/R549794",
        );

        let fields = FieldExtractor::new().extract(&msg);
        assert_eq!(fields.company.as_deref(), Some("Stryker"));
        assert_eq!(
            fields.position.as_deref(),
            Some("2026 Summer Intern - Software Engineering")
        );
        assert_eq!(fields.job_id.as_deref(), Some("R549794"));
        assert_eq!(fields.location.as_deref(), Some("Kalamazoo, MI"));
        assert_eq!(
            fields.status_link.as_deref(),
            Some("https://stryker.wd1.myworkdayjobs.com/en-US/StrykerCareers/job/R549794")
        );
    }

    #[test]
    fn test_empty_message_yields_nothing_for_required_fields() {
        let fields = FieldExtractor::new().extract(&message("", "", "", ""));
        assert_eq!(fields.company, None);
        assert_eq!(fields.position, None);
        assert_eq!(fields.status, None);
        assert_eq!(fields.source, None);
    }

    #[test]
    fn test_config_rules_are_checked_first() {
        let config = ExtractionConfig {
            position_rules: vec![crate::config::PositionRuleConfig {
                all_of: vec!["Data Scientist Intern".to_string()],
                title: "Data Science Intern (Summer)".to_string(),
            }],
            ..ExtractionConfig::default()
        };
        let extractor = FieldExtractor::from_config(&config);
        let fields = extractor.extract(&message("", "Data Scientist Intern", "", ""));
        assert_eq!(
            fields.position.as_deref(),
            Some("Data Science Intern (Summer)")
        );
    }

    #[test]
    fn test_guarded_extraction_succeeds() {
        let msg = message("jobs@lever.co", "Interview", "", "");
        let fields = extract_guarded(&FieldExtractor::new(), &msg).unwrap();
        assert_eq!(fields.source.as_deref(), Some("Lever"));
        assert_eq!(fields.status, Some(ApplicationStatus::Interview));
    }
}

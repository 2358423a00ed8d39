//! Composes extracted fields into a complete record.

use tracing::warn;

use crate::config::{DateZone, ExtractionConfig};
use crate::email::RawMessage;
use crate::extract::company::known_employer_in_sender;
use crate::extract::{ExtractedFields, ExtractionFailure};
use crate::record::{
    ApplicationRecord, ApplicationStatus, ParsedApplication, DEFAULT_POSITION, DEFAULT_SOURCE,
    UNKNOWN_COMPANY,
};

/// Maximum length, in characters, of the summarization excerpt.
pub const EXCERPT_CHARS: usize = 1000;

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    default_position: String,
    zone: DateZone,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION, DateZone::Local)
    }
}

impl RecordBuilder {
    pub fn new(default_position: impl Into<String>, zone: DateZone) -> Self {
        Self {
            default_position: default_position.into(),
            zone,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.default_position.clone(), config.timezone)
    }

    /// Builds the record. Notes are left empty for the summary step.
    pub fn build(
        &self,
        message: &RawMessage,
        extracted: Result<ExtractedFields, ExtractionFailure>,
    ) -> ParsedApplication {
        let record = match extracted {
            Ok(fields) => self.record_from_fields(message, fields),
            Err(failure) => {
                warn!(message_id = %failure.message_id, "Using minimal record: {}", failure.reason);
                self.minimal_record(message)
            }
        };

        ParsedApplication {
            record,
            raw_excerpt: excerpt(message),
        }
    }

    fn record_from_fields(
        &self,
        message: &RawMessage,
        fields: ExtractedFields,
    ) -> ApplicationRecord {
        ApplicationRecord {
            company: non_blank(fields.company).unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            position: non_blank(fields.position).unwrap_or_else(|| self.default_position.clone()),
            applied_date: self.applied_date(message.received_at_ms),
            status: fields.status.unwrap_or_default(),
            source: non_blank(fields.source).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            location: fields.location.unwrap_or_default(),
            job_id: fields.job_id.unwrap_or_default(),
            status_link: fields.status_link.unwrap_or_default(),
            notes: String::new(),
        }
    }

    fn minimal_record(&self, message: &RawMessage) -> ApplicationRecord {
        ApplicationRecord {
            company: known_employer_in_sender(message.sender())
                .unwrap_or(UNKNOWN_COMPANY)
                .to_string(),
            position: self.default_position.clone(),
            applied_date: self.applied_date(message.received_at_ms),
            status: ApplicationStatus::default(),
            source: DEFAULT_SOURCE.to_string(),
            location: String::new(),
            job_id: String::new(),
            status_link: String::new(),
            notes: String::new(),
        }
    }

    /// `YYYY-MM-DD` of the receipt time in the configured zone.
    pub fn applied_date(&self, received_at_ms: i64) -> String {
        self.zone
            .date_of(received_at_ms)
            .unwrap_or_else(|| {
                warn!(received_at_ms, "Receipt time out of range, using today");
                self.zone.today()
            })
            .format("%Y-%m-%d")
            .to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn excerpt(message: &RawMessage) -> String {
    format!("{}\n{}", message.subject(), message.body)
        .chars()
        .take(EXCERPT_CHARS)
        .collect()
}

//! Application records and the identity key used to deduplicate them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentinel company name used when no extractor could resolve one.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Default position used when no extractor could resolve one.
pub const DEFAULT_POSITION: &str = "Software Engineer Intern";

/// Source used when neither the sender nor the body names a platform.
pub const DEFAULT_SOURCE: &str = "Email";

/// Where an application currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    UnderReview,
    Interview,
    Offer,
    Rejected,
    Withdrawn,
    Accepted,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Applied,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
        ApplicationStatus::Accepted,
    ];

    /// Label written to the status column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
            ApplicationStatus::Accepted => "Accepted",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown application status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(status) = Self::ALL
            .iter()
            .find(|status| status.as_str().to_lowercase() == normalized)
        {
            return Ok(*status);
        }

        // Labels written by earlier versions of the tracker
        match normalized.as_str() {
            "interview scheduled" | "interview complete" => Ok(ApplicationStatus::Interview),
            "in progress" | "under_review" | "underreview" => Ok(ApplicationStatus::UnderReview),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// One row of the application table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub company: String,
    pub position: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub applied_date: String,
    pub status: ApplicationStatus,
    pub source: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub status_link: String,
    pub notes: String,
}

impl ApplicationRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.company, &self.position, &self.applied_date)
    }

    /// True when every mandatory field carries a value.
    pub fn is_complete(&self) -> bool {
        !self.company.trim().is_empty()
            && !self.position.trim().is_empty()
            && !self.applied_date.trim().is_empty()
            && !self.source.trim().is_empty()
            && !self.notes.trim().is_empty()
    }
}

/// A freshly built record together with the text it was extracted from.
///
/// The excerpt only feeds the summary prompt and is dropped before the
/// record is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedApplication {
    pub record: ApplicationRecord,
    pub raw_excerpt: String,
}

/// Composite key that decides whether two rows describe the same application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    company: String,
    position: String,
    applied_date: String,
}

impl IdentityKey {
    pub fn new(company: &str, position: &str, applied_date: &str) -> Self {
        Self {
            company: company.trim().to_lowercase(),
            position: position.trim().to_lowercase(),
            applied_date: applied_date.trim().to_lowercase(),
        }
    }
}

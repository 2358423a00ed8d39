use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::TableError;

/// Conditions that end a run in the `Failed` stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid date range: {after} is not before {before}")]
    InvalidDateRange { after: NaiveDate, before: NaiveDate },

    #[error("All {0} mail searches failed")]
    SearchUnavailable(usize),

    #[error("No job-related emails found between {after} and {before}")]
    NoRelevantEmails { after: NaiveDate, before: NaiveDate },

    #[error("Failed to write table: {0}")]
    Write(#[from] TableError),

    #[error("Table write task failed: {0}")]
    WriteTask(String),
}

/// Per-item problems recorded in the report while the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    SearchFailed { query: usize, error: String },
    FetchFailed { thread_id: String, error: String },
    ExtractionFailed {
        index: usize,
        subject: String,
        reason: String,
    },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::SearchFailed { query, error } => {
                write!(f, "Search query {} failed: {}", query, error)
            }
            PipelineWarning::FetchFailed { thread_id, error } => {
                write!(f, "Failed to fetch thread {}: {}", thread_id, error)
            }
            PipelineWarning::ExtractionFailed {
                index,
                subject,
                reason,
            } => write!(
                f,
                "Error processing email {} ({}): {}",
                index, subject, reason
            ),
        }
    }
}

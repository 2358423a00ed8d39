//! Short notes for each record, from a language model with a
//! deterministic fallback.

pub mod anthropic;
pub mod generator;

use async_trait::async_trait;
use thiserror::Error;

pub use anthropic::AnthropicSummarizer;
pub use generator::{fallback_summary, SummaryGenerator, MAX_SUMMARY_WORDS};

/// Errors from a summarization backend.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// Network or transport failure.
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend could not be set up.
    #[error("Summarizer configuration error: {0}")]
    Config(String),
}

/// A text completion backend.
#[async_trait]
pub trait SummaryService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, SummaryError>;
}

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    FindingEmails,
    ParsingEmails,
    Summarizing,
    Writing,
    Completed,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }

    /// Overall progress when the stage starts.
    pub fn percent(self) -> u8 {
        match self {
            Stage::Init => 0,
            Stage::FindingEmails => 5,
            Stage::ParsingEmails => 40,
            Stage::Summarizing => 60,
            Stage::Writing => 85,
            Stage::Completed | Stage::Failed => 100,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => write!(f, "Init"),
            Stage::FindingEmails => write!(f, "Finding emails"),
            Stage::ParsingEmails => write!(f, "Parsing emails"),
            Stage::Summarizing => write!(f, "Summarizing"),
            Stage::Writing => write!(f, "Writing"),
            Stage::Completed => write!(f, "Completed"),
            Stage::Failed => write!(f, "Failed"),
        }
    }
}

/// Progress event emitted during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub run_id: String,
    pub stage: Stage,
    pub percent: u8,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressUpdate {
    pub fn new(run_id: &str, stage: Stage, percent: u8, message: impl Into<String>) -> Self {
        Self {
            run_id: run_id.to_string(),
            stage,
            percent: percent.min(100),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// No-op reporter for tests and quiet runs.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Forwards updates to a tokio broadcast channel.
pub struct BroadcastProgress {
    sender: Arc<broadcast::Sender<ProgressUpdate>>,
}

impl BroadcastProgress {
    pub fn new(sender: Arc<broadcast::Sender<ProgressUpdate>>) -> Self {
        Self { sender }
    }

    /// Reporter plus a receiver subscribed before the first update.
    pub fn channel(capacity: usize) -> (Self, broadcast::Receiver<ProgressUpdate>) {
        let (sender, receiver) = broadcast::channel(capacity.max(1));
        (Self::new(Arc::new(sender)), receiver)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.sender.subscribe()
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, update: ProgressUpdate) {
        // No receivers is fine
        let _ = self.sender.send(update);
    }
}

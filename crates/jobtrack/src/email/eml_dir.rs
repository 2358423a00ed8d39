//! Offline mail source backed by a directory of `.eml` files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::DateZone;

use super::error::{EmailError, Result};
use super::message::{MessageRef, RawMessage, RawThread};
use super::parser::raw_message_from_bytes;
use super::query::SearchQuery;
use super::source::MailSource;

/// Every `.eml` file under a directory, parsed once at open time.
///
/// Message and thread ids are the file paths relative to the directory.
/// Search honours the query's date window only, with receipt dates taken in
/// the source's zone (local unless set with [`EmlDirectorySource::with_zone`]).
pub struct EmlDirectorySource {
    root: PathBuf,
    messages: Vec<RawMessage>,
    zone: DateZone,
}

impl EmlDirectorySource {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(EmailError::ConfigError(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }

        let mut messages = Vec::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_eml(path) {
                continue;
            }

            let id = path
                .strip_prefix(&root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            let raw = std::fs::read(path)?;
            match raw_message_from_bytes(&raw, &id, &id, None) {
                Ok(message) => {
                    debug!("Loaded {}", id);
                    messages.push(message);
                }
                Err(e) => warn!("Skipping unparsable message {}: {}", id, e),
            }
        }

        info!("Loaded {} messages from {}", messages.len(), root.display());
        Ok(Self {
            root,
            messages,
            zone: DateZone::default(),
        })
    }

    pub fn with_zone(mut self, zone: DateZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn is_eml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("eml"))
}

#[async_trait]
impl MailSource for EmlDirectorySource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<MessageRef>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| {
                self.zone
                    .date_of(m.received_at_ms)
                    .is_some_and(|date| query.contains_date(date))
            })
            .map(|m| MessageRef {
                id: m.id.clone(),
                thread_id: m.thread_id.clone(),
                snippet: m.snippet.clone(),
            })
            .collect())
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<RawThread> {
        let messages: Vec<RawMessage> = self
            .messages
            .iter()
            .filter(|m| m.thread_id == thread_id)
            .cloned()
            .collect();
        if messages.is_empty() {
            return Err(EmailError::ThreadNotFound(thread_id.to_string()));
        }
        Ok(RawThread {
            id: thread_id.to_string(),
            messages,
        })
    }
}

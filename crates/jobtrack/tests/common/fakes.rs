//! In-memory collaborators for pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use jobtrack::email::error::Result as EmailResult;
use jobtrack::email::{EmailError, MessageRef, RawMessage, RawThread, SearchQuery};
use jobtrack::summary::SummaryError;
use jobtrack::{ApplicationRecord, MailSource, SummaryService, TableError, TableStore};

/// Returns every message for every query, like a coarse mail search.
#[derive(Default)]
pub struct FakeMailSource {
    messages: Vec<RawMessage>,
    failing_terms: Vec<String>,
    fail_all_searches: bool,
    failing_threads: HashSet<String>,
    pub search_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

impl FakeMailSource {
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Searches whose terms contain `fragment` fail.
    pub fn failing_search(mut self, fragment: &str) -> Self {
        self.failing_terms.push(fragment.to_string());
        self
    }

    pub fn failing_all_searches(mut self) -> Self {
        self.fail_all_searches = true;
        self
    }

    pub fn failing_fetch(mut self, thread_id: &str) -> Self {
        self.failing_threads.insert(thread_id.to_string());
        self
    }
}

#[async_trait]
impl MailSource for FakeMailSource {
    async fn search(&self, query: &SearchQuery) -> EmailResult<Vec<MessageRef>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all_searches
            || self
                .failing_terms
                .iter()
                .any(|fragment| query.terms.contains(fragment.as_str()))
        {
            return Err(EmailError::ProtocolError("search rejected".to_string()));
        }

        Ok(self
            .messages
            .iter()
            .map(|m| MessageRef {
                id: m.id.clone(),
                thread_id: m.thread_id.clone(),
                snippet: m.snippet.clone(),
            })
            .collect())
    }

    async fn fetch_thread(&self, thread_id: &str) -> EmailResult<RawThread> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_threads.contains(thread_id) {
            return Err(EmailError::ConnectionFailed("connection reset".to_string()));
        }

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

/// Summarizer returning a fixed reply, or failing every call.
pub struct FakeSummarizer {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeSummarizer {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SummaryService for FakeSummarizer {
    async fn complete(&self, _prompt: &str) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| SummaryError::Communication("service unavailable".to_string()))
    }
}

/// Table store keeping tables in memory, keyed by path.
#[derive(Default)]
pub struct MemoryTable {
    tables: Mutex<HashMap<PathBuf, Vec<ApplicationRecord>>>,
}

impl MemoryTable {
    pub fn rows(&self, path: &Path) -> Vec<ApplicationRecord> {
        self.tables
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }
}

impl TableStore for MemoryTable {
    fn write_table(&self, records: &[ApplicationRecord], path: &Path) -> Result<(), TableError> {
        self.tables
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), records.to_vec());
        Ok(())
    }

    fn read_table(&self, path: &Path) -> Result<Vec<ApplicationRecord>, TableError> {
        Ok(self.rows(path))
    }

    fn table_exists(&self, path: &Path) -> bool {
        self.tables.lock().unwrap().contains_key(path)
    }
}

/// Table store whose writes always fail.
pub struct FailingTable;

impl TableStore for FailingTable {
    fn write_table(&self, _records: &[ApplicationRecord], _path: &Path) -> Result<(), TableError> {
        Err(TableError::Encode("disk full".to_string()))
    }

    fn read_table(&self, _path: &Path) -> Result<Vec<ApplicationRecord>, TableError> {
        Ok(Vec::new())
    }
}

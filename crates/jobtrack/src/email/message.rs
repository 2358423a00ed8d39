//! Message types handed from a mail source to the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Header list with case-insensitive lookup. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any existing value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .0
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn sender(&self) -> &str {
        self.get("From").unwrap_or_default()
    }

    pub fn subject(&self) -> &str {
        self.get("Subject").unwrap_or_default()
    }

    pub fn date(&self) -> &str {
        self.get("Date").unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// A single email as seen by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: String,
    pub thread_id: String,
    pub headers: Headers,
    pub snippet: String,
    /// Decoded plain-text body.
    pub body: String,
    /// Receipt time in epoch milliseconds.
    pub received_at_ms: i64,
}

impl RawMessage {
    pub fn sender(&self) -> &str {
        self.headers.sender()
    }

    pub fn subject(&self) -> &str {
        self.headers.subject()
    }
}

/// Ordered messages of one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawThread {
    pub id: String,
    pub messages: Vec<RawMessage>,
}

impl RawThread {
    /// First message that carries a subject or a sender, else the first one.
    pub fn primary_message(&self) -> Option<&RawMessage> {
        self.messages
            .iter()
            .find(|m| !m.subject().trim().is_empty() || !m.sender().trim().is_empty())
            .or_else(|| self.messages.first())
    }
}

/// Search hit. Only `thread_id` is needed to fetch the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub id: String,
    pub thread_id: String,
    pub snippet: String,
}

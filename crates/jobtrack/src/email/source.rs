//! The mail collaborator seen by the pipeline.

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::config::ImapConfig;

use super::client::ImapClient;
use super::error::{EmailError, Result};
use super::message::{MessageRef, RawThread};
use super::parser::raw_message_from_bytes;
use super::query::SearchQuery;

/// Search and fetch access to a mailbox.
#[async_trait]
pub trait MailSource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<MessageRef>>;

    async fn fetch_thread(&self, thread_id: &str) -> Result<RawThread>;

    /// Releases any connection. Default is a no-op.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// IMAP-backed source. Each message is its own thread, keyed by UID.
///
/// The connection is opened on first use.
pub struct ImapMailSource {
    client: Mutex<ImapClient>,
    gmail_search: bool,
}

impl ImapMailSource {
    pub fn new(config: ImapConfig) -> Self {
        let gmail_search = config.uses_gmail_search();
        Self {
            client: Mutex::new(ImapClient::new(config)),
            gmail_search,
        }
    }
}

#[async_trait]
impl MailSource for ImapMailSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<MessageRef>> {
        let mut client = self.client.lock().await;
        client.connect().await?;

        let uids = if self.gmail_search {
            client.search_gmail_raw(&query.to_string()).await?
        } else {
            client.search_criteria(&query.imap_criteria()).await?
        };

        debug!("IMAP search returned {} UIDs", uids.len());
        Ok(uids
            .into_iter()
            .map(|uid| MessageRef {
                id: uid.to_string(),
                thread_id: uid.to_string(),
                snippet: String::new(),
            })
            .collect())
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<RawThread> {
        let uid: u32 = thread_id
            .parse()
            .map_err(|_| EmailError::ThreadNotFound(thread_id.to_string()))?;

        let mut client = self.client.lock().await;
        client.connect().await?;
        let fetched = client.fetch_message_peek(uid).await?;

        let message = raw_message_from_bytes(
            &fetched.raw,
            thread_id,
            thread_id,
            fetched.internal_date_ms,
        )?;

        Ok(RawThread {
            id: thread_id.to_string(),
            messages: vec![message],
        })
    }

    async fn close(&self) -> Result<()> {
        let mut client = self.client.lock().await;
        if client.is_connected() {
            info!("Closing IMAP mail source");
        }
        client.disconnect().await
    }
}

//! IMAP client for reading a mailbox without modifying it.

use async_imap::Session;
use async_native_tls::TlsConnector;
use futures_util::StreamExt;
use log::{debug, info, warn};
use secrecy::ExposeSecret;

use crate::config::ImapConfig;

use super::error::{EmailError, Result};

/// Type alias for the underlying async stream (using async-std compatible TcpStream).
type AsyncTcpStream = async_io::Async<std::net::TcpStream>;

/// Type alias for the TLS stream used by the IMAP session.
type TlsStream = async_native_tls::TlsStream<AsyncTcpStream>;

/// Raw message bytes plus the server-side receipt time.
#[derive(Debug)]
pub struct FetchedMessage {
    pub uid: u32,
    pub raw: Vec<u8>,
    pub internal_date_ms: Option<i64>,
}

/// IMAP client for searching and fetching messages.
pub struct ImapClient {
    session: Option<Session<TlsStream>>,
    config: ImapConfig,
    current_folder: Option<String>,
}

impl ImapClient {
    pub fn new(config: ImapConfig) -> Self {
        Self {
            session: None,
            config,
            current_folder: None,
        }
    }

    /// Connects, logs in and opens the configured mailbox read-only.
    pub async fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            debug!("Already connected to IMAP server");
            return Ok(());
        }

        let password = self
            .config
            .password
            .resolve()
            .map_err(|e| EmailError::CredentialsNotFound(e.to_string()))?;

        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!("Connecting to IMAP server at {}", addr);

        let std_stream = std::net::TcpStream::connect(&addr)
            .map_err(|e| EmailError::ConnectionFailed(e.to_string()))?;
        std_stream
            .set_nonblocking(true)
            .map_err(|e| EmailError::ConnectionFailed(e.to_string()))?;
        let tcp_stream = async_io::Async::new(std_stream)
            .map_err(|e| EmailError::ConnectionFailed(e.to_string()))?;

        let tls_stream = TlsConnector::new()
            .connect(&self.config.host, tcp_stream)
            .await?;

        let client = async_imap::Client::new(tls_stream);
        let session = client
            .login(&self.config.username, password.expose_secret())
            .await
            .map_err(|(e, _)| EmailError::AuthenticationFailed(e.to_string()))?;

        info!("Successfully authenticated to IMAP server");
        self.session = Some(session);

        let mailbox = self.config.mailbox.clone();
        self.examine_folder(&mailbox).await
    }

    /// Opens a folder with EXAMINE so nothing in it can change.
    pub async fn examine_folder(&mut self, folder: &str) -> Result<()> {
        let session = self.session_mut()?;

        info!("Examining folder: {}", folder);
        session.examine(folder).await.map_err(|e| {
            if e.to_string().contains("Mailbox doesn't exist") || e.to_string().contains("NO") {
                EmailError::FolderNotFound(folder.to_string())
            } else {
                EmailError::ProtocolError(e.to_string())
            }
        })?;

        self.current_folder = Some(folder.to_string());
        Ok(())
    }

    /// Runs a Gmail search expression through the `X-GM-RAW` extension.
    pub async fn search_gmail_raw(&mut self, raw_query: &str) -> Result<Vec<u32>> {
        let escaped = raw_query.replace('\\', "\\\\").replace('"', "\\\"");
        self.uid_search(&format!("X-GM-RAW \"{}\"", escaped)).await
    }

    /// Standard IMAP search with prepared criteria, e.g. `SINCE .. BEFORE .. FROM ..`.
    pub async fn search_criteria(&mut self, criteria: &str) -> Result<Vec<u32>> {
        self.uid_search(criteria).await
    }

    async fn uid_search(&mut self, query: &str) -> Result<Vec<u32>> {
        let session = self.session_mut()?;
        debug!("Searching with query: {}", query);

        let uids = session
            .uid_search(query)
            .await
            .map_err(|e| EmailError::ProtocolError(e.to_string()))?;

        let mut uid_list: Vec<u32> = uids.into_iter().collect();
        uid_list.sort_unstable();
        debug!("Found {} messages matching search", uid_list.len());
        Ok(uid_list)
    }

    /// Fetches one message with BODY.PEEK[] so it is not marked as read.
    pub async fn fetch_message_peek(&mut self, uid: u32) -> Result<FetchedMessage> {
        let session = self.session_mut()?;
        debug!("Fetching email with UID {}", uid);

        let mut messages = session
            .uid_fetch(uid.to_string(), "(UID INTERNALDATE BODY.PEEK[])")
            .await
            .map_err(|e| EmailError::ProtocolError(e.to_string()))?;

        // Drain the stream so the session is ready for the next command
        let mut fetched = None;
        while let Some(item) = messages.next().await {
            let message = item.map_err(|e| EmailError::ProtocolError(e.to_string()))?;
            if fetched.is_none() {
                if let Some(body) = message.body() {
                    fetched = Some((
                        body.to_vec(),
                        message.internal_date().map(|d| d.timestamp_millis()),
                    ));
                }
            }
        }

        let (raw, internal_date_ms) = fetched.ok_or_else(|| {
            EmailError::ProtocolError(format!("Message with UID {} not found", uid))
        })?;

        Ok(FetchedMessage {
            uid,
            raw,
            internal_date_ms,
        })
    }

    /// Logs out. Safe to call when not connected.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            info!("Disconnecting from IMAP server");
            session
                .logout()
                .await
                .map_err(|e| EmailError::ProtocolError(e.to_string()))?;
        }
        self.current_folder = None;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn session_mut(&mut self) -> Result<&mut Session<TlsStream>> {
        self.session
            .as_mut()
            .ok_or_else(|| EmailError::ConnectionFailed("Not connected".to_string()))
    }
}

impl Drop for ImapClient {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!("ImapClient dropped without explicit disconnect - session will be closed");
        }
    }
}

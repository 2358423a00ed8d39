//! Mail access: search queries, message types and the sources that
//! produce them.

pub mod client;
pub mod eml_dir;
pub mod error;
pub mod message;
pub mod parser;
pub mod query;
pub mod source;

pub use client::ImapClient;
pub use eml_dir::EmlDirectorySource;
pub use error::EmailError;
pub use message::{Headers, MessageRef, RawMessage, RawThread};
pub use parser::raw_message_from_bytes;
pub use query::{default_before, job_search_queries, SearchQuery};
pub use source::{ImapMailSource, MailSource};

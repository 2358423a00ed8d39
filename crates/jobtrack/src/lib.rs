pub mod builder;
pub mod classifier;
pub mod config;
pub mod email;
pub mod error;
pub mod extract;
pub mod merge;
pub mod pipeline;
pub mod record;
pub mod sanitize;
pub mod secrets;
pub mod summary;
pub mod table;
pub mod telemetry;

pub use builder::RecordBuilder;
pub use classifier::RelevanceClassifier;
pub use config::{load_config, load_config_from_str, Config};
pub use email::{EmlDirectorySource, ImapMailSource, MailSource, RawMessage, RawThread};
pub use error::{ConfigError, JobtrackError, Result, TableError};
pub use extract::{extract_guarded, ExtractedFields, FieldExtractor};
pub use merge::merge;
pub use pipeline::{Pipeline, RunReport, RunRequest, Stage};
pub use record::{ApplicationRecord, ApplicationStatus, IdentityKey, ParsedApplication};
pub use secrets::{resolve_secret, SecretError, SecretRef};
pub use summary::{fallback_summary, SummaryGenerator, SummaryService};
pub use table::{persist, PersistOutcome, TableStore, WriteMode, XlsxTable};

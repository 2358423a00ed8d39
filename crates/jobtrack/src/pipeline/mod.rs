pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod report;
pub mod runner;

pub use config::RunRequest;
pub use context::RunContext;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{BroadcastProgress, NoopProgress, ProgressReporter, ProgressUpdate, Stage};
pub use report::RunReport;
pub use runner::Pipeline;

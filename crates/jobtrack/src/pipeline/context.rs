use std::path::PathBuf;

use tracing::{error, warn};
use uuid::Uuid;

use super::error::{PipelineError, PipelineWarning};
use super::progress::Stage;
use super::report::RunReport;

/// Mutable state of one run, turned into a [`RunReport`] at the end.
pub struct RunContext {
    pub run_id: String,
    pub stage: Stage,
    /// Stage that was active when the run failed.
    pub failed_at: Option<Stage>,
    pub output_path: PathBuf,

    pub emails_found: usize,
    pub applications_processed: usize,
    pub applications_written: usize,
    pub table_rows: usize,

    // Warnings first, then the fatal error if any
    pub errors: Vec<String>,
}

impl RunContext {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            stage: Stage::Init,
            failed_at: None,
            output_path: output_path.into(),
            emails_found: 0,
            applications_processed: 0,
            applications_written: 0,
            table_rows: 0,
            errors: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: PipelineWarning) {
        warn!(stage = %self.stage, "{}", warning);
        self.errors.push(warning.to_string());
    }

    pub fn fail(&mut self, failure: PipelineError) {
        error!(stage = %self.stage, "Run failed: {}", failure);
        self.failed_at = Some(self.stage);
        self.stage = Stage::Failed;
        self.errors.push(failure.to_string());
    }

    pub fn into_report(self) -> RunReport {
        RunReport {
            success: self.stage == Stage::Completed,
            run_id: self.run_id,
            stage: self.stage,
            failed_at: self.failed_at,
            emails_found: self.emails_found,
            applications_processed: self.applications_processed,
            applications_written: self.applications_written,
            table_rows: self.table_rows,
            errors: self.errors,
            output_path: self.output_path,
        }
    }
}

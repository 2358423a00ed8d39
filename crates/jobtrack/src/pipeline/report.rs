use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use super::progress::Stage;

/// Outcome of a run. Always produced, also when the run fails.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: String,
    pub success: bool,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<Stage>,
    /// Job-related emails that passed the relevance check.
    pub emails_found: usize,
    pub applications_processed: usize,
    /// This run's records in overwrite mode, newly added rows in append mode.
    pub applications_written: usize,
    /// Rows in the table after the run.
    pub table_rows: usize,
    pub errors: Vec<String>,
    pub output_path: PathBuf,
}

impl RunReport {
    /// Multi-line, human-readable rendering.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.success {
            let _ = writeln!(out, "Job application processing completed");
        } else {
            match self.failed_at {
                Some(stage) => {
                    let _ = writeln!(out, "Job application processing failed ({})", stage);
                }
                None => {
                    let _ = writeln!(out, "Job application processing failed");
                }
            }
        }

        let _ = writeln!(out, "  Emails found:           {}", self.emails_found);
        let _ = writeln!(out, "  Applications processed: {}", self.applications_processed);
        let _ = writeln!(out, "  Applications written:   {}", self.applications_written);
        if self.success {
            let _ = writeln!(out, "  Rows in table:          {}", self.table_rows);
            let _ = writeln!(out, "  Output file:            {}", self.output_path.display());
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "{}:", if self.success { "Warnings" } else { "Errors" });
            for error in &self.errors {
                let _ = writeln!(out, "  - {}", error);
            }
        }
        out
    }
}

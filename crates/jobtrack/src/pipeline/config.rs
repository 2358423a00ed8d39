use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::Config;
use crate::email::default_before;
use crate::secrets::expand_home;
use crate::table::WriteMode;

/// Parameters of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Inclusive start of the search window.
    pub after: NaiveDate,
    /// Exclusive end of the search window; tomorrow when unset.
    pub before: Option<NaiveDate>,
    pub output_path: PathBuf,
    pub mode: WriteMode,
}

impl RunRequest {
    pub fn new(after: NaiveDate, output_path: impl Into<PathBuf>) -> Self {
        Self {
            after,
            before: None,
            output_path: output_path.into(),
            mode: WriteMode::default(),
        }
    }

    /// Output path and write mode taken from the `output` section.
    pub fn from_config(config: &Config, after: NaiveDate) -> Self {
        Self {
            after,
            before: None,
            output_path: PathBuf::from(expand_home(&config.output.path)),
            mode: config.output.mode,
        }
    }

    pub fn with_before(mut self, before: NaiveDate) -> Self {
        self.before = Some(before);
        self
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn effective_before(&self) -> NaiveDate {
        self.before.unwrap_or_else(default_before)
    }
}

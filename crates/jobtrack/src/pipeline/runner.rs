use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};

use crate::builder::RecordBuilder;
use crate::classifier::RelevanceClassifier;
use crate::config::Config;
use crate::email::{
    job_search_queries, EmlDirectorySource, ImapMailSource, MailSource, MessageRef, RawMessage,
};
use crate::error::{ConfigError, JobtrackError};
use crate::extract::{extract_guarded, FieldExtractor};
use crate::record::{ApplicationRecord, ParsedApplication};
use crate::sanitize;
use crate::secrets::expand_home;
use crate::summary::SummaryGenerator;
use crate::table::{persist, TableStore, WriteMode, XlsxTable};

use super::config::RunRequest;
use super::context::RunContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{ProgressReporter, ProgressUpdate, Stage};
use super::report::RunReport;

const SUBJECT_CONTEXT_CHARS: usize = 50;

/// Sequences search, extraction, summarization and persistence for a run.
pub struct Pipeline {
    mail: Arc<dyn MailSource>,
    classifier: RelevanceClassifier,
    extractor: FieldExtractor,
    builder: RecordBuilder,
    summarizer: SummaryGenerator,
    table: Arc<dyn TableStore>,
}

impl Pipeline {
    /// Builds every collaborator from configuration.
    pub fn from_config(config: &Config) -> Result<Self, JobtrackError> {
        let mail: Arc<dyn MailSource> = match (&config.mail.imap, &config.mail.eml_dir) {
            (Some(imap), _) => Arc::new(ImapMailSource::new(imap.clone())),
            (None, Some(dir)) => Arc::new(
                EmlDirectorySource::open(expand_home(dir))?
                    .with_zone(config.extraction.timezone),
            ),
            (None, None) => {
                return Err(ConfigError::Validation {
                    message: "no mail source configured: set mail.imap or mail.eml_dir"
                        .to_string(),
                }
                .into())
            }
        };

        Ok(Self::new(
            mail,
            FieldExtractor::from_config(&config.extraction),
            RecordBuilder::from_config(&config.extraction),
            SummaryGenerator::from_config(&config.summarizer),
            Arc::new(XlsxTable::new(config.output.sheet_name.as_str())),
        ))
    }

    pub fn new(
        mail: Arc<dyn MailSource>,
        extractor: FieldExtractor,
        builder: RecordBuilder,
        summarizer: SummaryGenerator,
        table: Arc<dyn TableStore>,
    ) -> Self {
        Self {
            mail,
            classifier: RelevanceClassifier::new(),
            extractor,
            builder,
            summarizer,
            table,
        }
    }

    /// Runs the full pipeline. Never returns an error: failures end the run
    /// in [`Stage::Failed`] and are listed in the report.
    pub async fn run(&self, request: &RunRequest, progress: &dyn ProgressReporter) -> RunReport {
        // The default upper bound moves at midnight; pin it once per run.
        let before = request.effective_before();
        let request = &request.clone().with_before(before);

        let mut ctx = RunContext::new(&request.output_path);
        let span = info_span!("pipeline",
            run_id = %ctx.run_id,
            after = %request.after,
            before = %before,
            mode = ?request.mode,
            file = %sanitize::redact_path(&request.output_path),
        );

        self.run_steps(&mut ctx, request, progress)
            .instrument(span)
            .await;

        let report = ctx.into_report();
        progress.report(ProgressUpdate::new(
            &report.run_id,
            report.stage,
            100,
            if report.success {
                format!("Wrote {} applications", report.applications_written)
            } else {
                report.errors.last().cloned().unwrap_or_default()
            },
        ));
        report
    }

    async fn run_steps(
        &self,
        ctx: &mut RunContext,
        request: &RunRequest,
        progress: &dyn ProgressReporter,
    ) {
        info!("Starting job application run");
        self.enter(ctx, Stage::Init, progress, "Starting run");

        let before = request.effective_before();
        if before <= request.after {
            ctx.fail(PipelineError::InvalidDateRange {
                after: request.after,
                before,
            });
            return;
        }

        // Step 1: Find job-related emails
        self.enter(ctx, Stage::FindingEmails, progress, "Searching mail...");
        let found = self
            .step_find_emails(ctx, request, progress)
            .instrument(info_span!("find_emails"))
            .await;
        let messages = match found {
            Ok(messages) => messages,
            Err(e) => {
                ctx.fail(e);
                return;
            }
        };

        // Step 2: Extract fields and build records
        self.enter(ctx, Stage::ParsingEmails, progress, "Extracting application details...");
        let parsed = {
            let _step = info_span!("parse_emails", count = messages.len()).entered();
            self.step_parse_emails(ctx, &messages)
        };

        // Step 3: Summaries
        self.enter(ctx, Stage::Summarizing, progress, "Generating summaries...");
        let records = self
            .step_summarize(ctx, parsed, progress)
            .instrument(info_span!("summarize"))
            .await;

        // Step 4: Persist
        self.enter(ctx, Stage::Writing, progress, "Writing table...");
        let written = self
            .step_write(ctx, records, request)
            .instrument(info_span!("write_table"))
            .await;
        if let Err(e) = written {
            ctx.fail(e);
            return;
        }

        ctx.stage = Stage::Completed;
        info!(
            emails = ctx.emails_found,
            processed = ctx.applications_processed,
            written = ctx.applications_written,
            rows = ctx.table_rows,
            "Run completed"
        );
    }

    fn enter(
        &self,
        ctx: &mut RunContext,
        stage: Stage,
        progress: &dyn ProgressReporter,
        message: &str,
    ) {
        ctx.stage = stage;
        debug!(stage = %stage, "Entering stage");
        progress.report(ProgressUpdate::new(
            &ctx.run_id,
            stage,
            stage.percent(),
            message,
        ));
    }

    async fn step_find_emails(
        &self,
        ctx: &mut RunContext,
        request: &RunRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<RawMessage>, PipelineError> {
        let queries = job_search_queries(request.after, Some(request.effective_before()));
        let total = queries.len();

        let mut refs: Vec<MessageRef> = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut failed = 0;
        for (i, query) in queries.iter().enumerate() {
            match self.mail.search(query).await {
                Ok(found) => {
                    debug!(query = i + 1, found = found.len(), "Search finished");
                    refs.extend(found.into_iter().filter(|r| seen_ids.insert(r.id.clone())));
                }
                Err(e) => {
                    failed += 1;
                    ctx.warn(PipelineWarning::SearchFailed {
                        query: i + 1,
                        error: e.to_string(),
                    });
                }
            }
            progress.report(ProgressUpdate::new(
                &ctx.run_id,
                Stage::FindingEmails,
                5 + (15 * (i + 1) / total.max(1)) as u8,
                format!("Ran search {}/{}", i + 1, total),
            ));
        }

        if total > 0 && failed == total {
            self.close_mail().await;
            return Err(PipelineError::SearchUnavailable(total));
        }

        let candidates = refs.len();
        let mut seen_threads = HashSet::new();
        let mut messages = Vec::new();
        for (i, message_ref) in refs.iter().enumerate() {
            if !seen_threads.insert(message_ref.thread_id.as_str()) {
                continue;
            }

            match self.mail.fetch_thread(&message_ref.thread_id).await {
                Ok(thread) => match thread.primary_message() {
                    Some(message) if self.classifier.is_job_related(message) => {
                        debug!(
                            message_id = %message.id,
                            sender = %sanitize::redact_address(message.sender()),
                            signals = ?self.classifier.match_signals(message),
                            "Job-related email"
                        );
                        messages.push(message.clone());
                    }
                    Some(message) => {
                        debug!(
                            message_id = %message.id,
                            sender = %sanitize::redact_address(message.sender()),
                            "Skipping unrelated email"
                        );
                    }
                    None => debug!(thread_id = %thread.id, "Skipping empty thread"),
                },
                Err(e) => ctx.warn(PipelineWarning::FetchFailed {
                    thread_id: message_ref.thread_id.clone(),
                    error: e.to_string(),
                }),
            }

            if (i + 1) % 10 == 0 || i + 1 == candidates {
                progress.report(ProgressUpdate::new(
                    &ctx.run_id,
                    Stage::FindingEmails,
                    20 + (20 * (i + 1) / candidates.max(1)) as u8,
                    format!("Fetched {}/{} candidates", i + 1, candidates),
                ));
            }
        }
        self.close_mail().await;

        ctx.emails_found = messages.len();
        info!(
            candidates,
            relevant = messages.len(),
            "Found job-related emails"
        );

        if messages.is_empty() {
            return Err(PipelineError::NoRelevantEmails {
                after: request.after,
                before: request.effective_before(),
            });
        }
        Ok(messages)
    }

    async fn close_mail(&self) {
        if let Err(e) = self.mail.close().await {
            debug!("Closing mail source failed: {}", e);
        }
    }

    fn step_parse_emails(
        &self,
        ctx: &mut RunContext,
        messages: &[RawMessage],
    ) -> Vec<ParsedApplication> {
        let mut parsed = Vec::with_capacity(messages.len());
        for (i, message) in messages.iter().enumerate() {
            let extracted = extract_guarded(&self.extractor, message);
            if let Err(failure) = &extracted {
                ctx.warn(PipelineWarning::ExtractionFailed {
                    index: i + 1,
                    subject: message.subject().chars().take(SUBJECT_CONTEXT_CHARS).collect(),
                    reason: failure.reason.clone(),
                });
            }

            let application = self.builder.build(message, extracted);
            debug!(
                index = i + 1,
                company = %application.record.company,
                status = %application.record.status,
                "Built record"
            );
            parsed.push(application);
        }

        ctx.applications_processed = parsed.len();
        parsed
    }

    async fn step_summarize(
        &self,
        ctx: &mut RunContext,
        parsed: Vec<ParsedApplication>,
        progress: &dyn ProgressReporter,
    ) -> Vec<ApplicationRecord> {
        let total = parsed.len();
        let mut records = Vec::with_capacity(total);
        for (i, application) in parsed.into_iter().enumerate() {
            let notes = self.summarizer.summarize(&application).await;
            let mut record = application.record;
            record.notes = notes;
            records.push(record);

            progress.report(ProgressUpdate::new(
                &ctx.run_id,
                Stage::Summarizing,
                60 + (25 * (i + 1) / total.max(1)) as u8,
                format!("Summarized {}/{}", i + 1, total),
            ));
        }
        records
    }

    async fn step_write(
        &self,
        ctx: &mut RunContext,
        records: Vec<ApplicationRecord>,
        request: &RunRequest,
    ) -> Result<(), PipelineError> {
        let table = Arc::clone(&self.table);
        let path = request.output_path.clone();
        let mode = request.mode;
        let new_records = records.len();

        let outcome = tokio::task::spawn_blocking(move || {
            persist(table.as_ref(), &records, &path, mode)
        })
        .await
        .map_err(|e| PipelineError::WriteTask(e.to_string()))??;

        ctx.applications_written = match mode {
            WriteMode::Overwrite => new_records,
            WriteMode::Append => outcome.rows_added,
        };
        ctx.table_rows = outcome.rows_written;
        Ok(())
    }
}

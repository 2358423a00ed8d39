//! Builders for test messages and records.

#![allow(dead_code)]

use chrono::NaiveDate;

use jobtrack::email::{Headers, RawMessage};
use jobtrack::{ApplicationRecord, ApplicationStatus};

/// 2025-09-01 12:00:00 UTC
pub const SEPT_FIRST_MS: i64 = 1_756_728_000_000;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builder for `RawMessage` values.
pub struct MessageBuilder {
    id: String,
    thread_id: Option<String>,
    from: String,
    subject: String,
    snippet: Option<String>,
    body: String,
    received_at_ms: i64,
}

impl MessageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            thread_id: None,
            from: String::new(),
            subject: String::new(),
            snippet: None,
            body: String::new(),
            received_at_ms: SEPT_FIRST_MS,
        }
    }

    pub fn from(mut self, from: &str) -> Self {
        self.from = from.to_string();
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    /// Defaults to the first 200 characters of the body.
    pub fn snippet(mut self, snippet: &str) -> Self {
        self.snippet = Some(snippet.to_string());
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn thread(mut self, thread_id: &str) -> Self {
        self.thread_id = Some(thread_id.to_string());
        self
    }

    pub fn received_at_ms(mut self, ms: i64) -> Self {
        self.received_at_ms = ms;
        self
    }

    pub fn build(self) -> RawMessage {
        let headers: Headers = [("From", self.from.as_str()), ("Subject", self.subject.as_str())]
            .into_iter()
            .collect();
        RawMessage {
            thread_id: self.thread_id.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            headers,
            snippet: self
                .snippet
                .unwrap_or_else(|| self.body.chars().take(200).collect()),
            body: self.body,
            received_at_ms: self.received_at_ms,
        }
    }
}

/// The Stryker confirmation used across tests.
pub fn stryker_confirmation() -> RawMessage {
    MessageBuilder::new("stryker-1")
        .from("Stryker Recruiting <recruiting@stryker.com>")
        .subject("2026 Summer Intern - Software Engineering Campus 26")
        .snippet("Thank you for applying to R549794 at Stryker")
        .body(
            "Thank you for applying to 2026 Summer Intern - Software Engineering (R549794).\n\
             Location: Kalamazoo, MI\n\
             Track your application at https://stryker.wd1.myworkdayjobs.com/en-US/StrykerCareers",
        )
        .build()
}

/// A rejection that also thanks the candidate for applying.
pub fn acme_rejection() -> RawMessage {
    MessageBuilder::new("acme-1")
        .from("Acme Talent <talent@acmerobotics.com>")
        .subject("Unfortunately, we will not be moving forward")
        .body(
            "Hi,\n\nThank you for applying to the Software Engineer Intern role. \
             Unfortunately, we have decided to move forward with other candidates.",
        )
        .build()
}

/// An interview invitation from a Greenhouse-hosted employer.
pub fn globex_interview() -> RawMessage {
    MessageBuilder::new("globex-1")
        .from("Globex Recruiting <no-reply@us.greenhouse-mail.io>")
        .subject("Interview invitation - Data Scientist Intern")
        .body(
            "We would like to schedule a phone screen for the Data Scientist Intern position. \
             Please pick a time: https://boards.greenhouse.io/globex/jobs/4412345",
        )
        .received_at_ms(SEPT_FIRST_MS + 86_400_000)
        .build()
}

/// Not job related.
pub fn newsletter() -> RawMessage {
    MessageBuilder::new("news-1")
        .from("Garden Weekly <news@gardenweekly.example>")
        .subject("Ten tomatoes to plant this fall")
        .body("Our favourite heirloom varieties, ranked.")
        .build()
}

pub fn record(company: &str, position: &str, applied_date: &str) -> ApplicationRecord {
    ApplicationRecord {
        company: company.to_string(),
        position: position.to_string(),
        applied_date: applied_date.to_string(),
        status: ApplicationStatus::Applied,
        source: "Email".to_string(),
        location: String::new(),
        job_id: String::new(),
        status_link: String::new(),
        notes: format!("Applied to {}.", company),
    }
}

/// RFC 5322 text for `.eml` fixtures.
pub fn eml(id: &str, from: &str, subject: &str, date_rfc2822: &str, body: &str) -> String {
    format!(
        "From: {}\r\nTo: me@example.com\r\nSubject: {}\r\nDate: {}\r\n\
         Message-ID: <{}@example.com>\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
        from, subject, date_rfc2822, id, body
    )
}

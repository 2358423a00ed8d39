//! Decides whether a message is about a job application.

use crate::email::RawMessage;

/// Phrases that mark a message as job related wherever they appear.
pub const JOB_KEYWORDS: &[&str] = &[
    "application",
    "interview",
    "position",
    "role",
    "job",
    "internship",
    "hiring",
    "recruit",
    "candidate",
    "resume",
    "cv",
    "opportunity",
    "opening",
    "career",
    "thank you for applying",
    "application received",
    "application status",
    "next steps",
    "phone screen",
    "technical interview",
    "final round",
    "offer",
    "rejection",
    "unfortunately",
    "congratulations",
];

/// Applicant tracking systems and job boards. A sender on one of these is
/// job related regardless of content.
pub const JOB_DOMAINS: &[&str] = &[
    "greenhouse.io",
    "lever.co",
    "workable.com",
    "bamboohr.com",
    "ashbyhq.com",
    "eightfold.ai",
    "icims.com",
    "smartrecruiters.com",
    "workday.com",
    "successfactors.com",
    "taleo.net",
    "breezy.hr",
    "recruitee.com",
    "jobvite.com",
    "indeed.com",
    "linkedin.com",
    "glassdoor.com",
    "angel.co",
    "workatastartup.com",
];

/// Which signal made a message relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceSignal {
    Keyword(&'static str),
    Domain(&'static str),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceClassifier;

impl RelevanceClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn is_job_related(&self, message: &RawMessage) -> bool {
        let sender = message.sender().to_lowercase();
        if JOB_DOMAINS.iter().any(|domain| sender.contains(domain)) {
            return true;
        }
        let haystack = Self::haystack(message, &sender);
        JOB_KEYWORDS.iter().any(|keyword| haystack.contains(keyword))
    }

    /// Every keyword and domain that matched, keywords first.
    pub fn match_signals(&self, message: &RawMessage) -> Vec<RelevanceSignal> {
        let sender = message.sender().to_lowercase();
        let haystack = Self::haystack(message, &sender);

        let keywords = JOB_KEYWORDS
            .iter()
            .copied()
            .filter(|keyword| haystack.contains(keyword))
            .map(RelevanceSignal::Keyword);
        let domains = JOB_DOMAINS
            .iter()
            .copied()
            .filter(|domain| sender.contains(domain))
            .map(RelevanceSignal::Domain);

        keywords.chain(domains).collect()
    }

    fn haystack(message: &RawMessage, lowered_sender: &str) -> String {
        format!(
            "{} {} {}",
            message.subject().to_lowercase(),
            message.body.to_lowercase(),
            lowered_sender
        )
    }
}

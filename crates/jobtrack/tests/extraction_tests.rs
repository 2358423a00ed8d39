mod common;

use common::*;
use jobtrack::config::DateZone;
use jobtrack::extract::status::extract_status;
use jobtrack::record::{DEFAULT_POSITION, UNKNOWN_COMPANY};
use jobtrack::{
    extract_guarded, ApplicationStatus, FieldExtractor, RecordBuilder, RelevanceClassifier,
};

fn builder() -> RecordBuilder {
    RecordBuilder::new(DEFAULT_POSITION, DateZone::Utc)
}

#[test]
fn test_workday_confirmation_fields() {
    let message = stryker_confirmation();
    assert!(RelevanceClassifier::new().is_job_related(&message));

    let extracted = extract_guarded(&FieldExtractor::new(), &message);
    let record = builder().build(&message, extracted).record;

    assert_eq!(record.company, "Stryker");
    assert_eq!(record.job_id, "R549794");
    assert_eq!(record.position, "2026 Summer Intern - Software Engineering");
    assert_eq!(record.location, "Kalamazoo, MI");
    assert_eq!(record.status, ApplicationStatus::Applied);
    assert_eq!(record.applied_date, "2025-09-01");
    assert!(record.status_link.contains("myworkdayjobs.com"));
    assert!(record.notes.is_empty());
}

#[test]
fn test_rejection_beats_thank_you() {
    let message = acme_rejection();
    assert!(RelevanceClassifier::new().is_job_related(&message));

    let extracted = extract_guarded(&FieldExtractor::new(), &message);
    let record = builder().build(&message, extracted).record;
    assert_eq!(record.status, ApplicationStatus::Rejected);
}

#[test]
fn test_interview_from_ats_sender() {
    let message = globex_interview();
    let extracted = extract_guarded(&FieldExtractor::new(), &message);
    let record = builder().build(&message, extracted).record;

    assert_eq!(record.status, ApplicationStatus::Interview);
    assert_eq!(record.applied_date, "2025-09-02");
    assert!(record.status_link.starts_with("https://boards.greenhouse.io/"));
}

#[test]
fn test_unrelated_mail_is_not_job_related() {
    assert!(!RelevanceClassifier::new().is_job_related(&newsletter()));
}

#[test]
fn test_status_priority_table() {
    let cases = [
        ("We regret to inform you. Thank you for applying.", Some(ApplicationStatus::Rejected)),
        ("Congratulations! Please schedule a call.", Some(ApplicationStatus::Offer)),
        ("Let's schedule your technical interview", Some(ApplicationStatus::Interview)),
        ("We received your application", Some(ApplicationStatus::Applied)),
        ("Your application is under review", Some(ApplicationStatus::UnderReview)),
        ("Weekly digest", None),
    ];

    for (text, expected) in cases {
        assert_eq!(extract_status(text), expected, "status for {:?}", text);
    }
}

#[test]
fn test_blank_message_still_builds_complete_record() {
    let message = MessageBuilder::new("blank").build();
    let extracted = extract_guarded(&FieldExtractor::new(), &message);
    let record = builder().build(&message, extracted).record;

    assert_eq!(record.company, UNKNOWN_COMPANY);
    assert_eq!(record.position, DEFAULT_POSITION);
    assert_eq!(record.status, ApplicationStatus::Applied);
    assert!(!record.source.is_empty());
    assert_eq!(record.applied_date, "2025-09-01");
}

#[test]
fn test_extraction_is_total_on_odd_input() {
    let long = "applied ".repeat(5000);
    let bodies = [
        "R\u{0}549794 ::: ### Location:",
        "https://",
        "Position: \u{1F600}\u{1F600}\u{1F600}",
        long.as_str(),
    ];

    for body in bodies {
        let message = MessageBuilder::new("odd")
            .from("\"\" <@>")
            .subject("Re: Re: Fwd:")
            .body(body)
            .build();
        assert!(extract_guarded(&FieldExtractor::new(), &message).is_ok());
    }
}

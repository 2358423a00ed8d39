//! Application status from keyword sets.

use crate::record::ApplicationStatus;

/// Checked in order; the first set with a hit decides the status.
const STATUS_KEYWORDS: &[(ApplicationStatus, &[&str])] = &[
    (
        ApplicationStatus::Rejected,
        &[
            "unfortunately",
            "regret",
            "sorry to inform",
            "not selected",
            "declined",
            "not moving forward",
            "not be moving forward",
            "not move forward",
            "not to move forward",
        ],
    ),
    (
        ApplicationStatus::Offer,
        &[
            "congratulations",
            "offer",
            "pleased to inform",
            "happy to inform",
            "pleased to extend",
        ],
    ),
    (
        ApplicationStatus::Interview,
        &["interview", "phone screen", "technical", "next step", "schedule"],
    ),
    (
        ApplicationStatus::Applied,
        &[
            "received",
            "thank you for applying",
            "application submitted",
            "submitted",
        ],
    ),
    (
        ApplicationStatus::UnderReview,
        &["under review", "reviewing", "in progress"],
    ),
];

pub fn extract_status(subject_body: &str) -> Option<ApplicationStatus> {
    let lowered = subject_body.to_lowercase();
    STATUS_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(status, _)| *status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_priority() {
        let cases = [
            (
                "Unfortunately, we will not be moving forward\nthank you for applying",
                Some(ApplicationStatus::Rejected),
            ),
            (
                "Congratulations! Next steps inside",
                Some(ApplicationStatus::Offer),
            ),
            (
                "Please schedule your phone screen\nWe received your application",
                Some(ApplicationStatus::Interview),
            ),
            (
                "Application submitted\nThanks",
                Some(ApplicationStatus::Applied),
            ),
            (
                "Your candidacy is under review",
                Some(ApplicationStatus::UnderReview),
            ),
            ("Hello there", None),
        ];

        for (text, expected) in cases {
            assert_eq!(extract_status(text), expected, "text: {}", text);
        }
    }
}

//! Deduplicating merge of record lists.

use std::collections::HashSet;

use crate::record::ApplicationRecord;

/// Existing rows followed by new rows, keeping only the first record for
/// each identity key. Order of first occurrence is preserved.
pub fn merge(
    existing: impl IntoIterator<Item = ApplicationRecord>,
    new: impl IntoIterator<Item = ApplicationRecord>,
) -> Vec<ApplicationRecord> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(new)
        .filter(|record| seen.insert(record.identity_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ApplicationStatus;

    fn record(
        company: &str,
        position: &str,
        date: &str,
        status: ApplicationStatus,
    ) -> ApplicationRecord {
        ApplicationRecord {
            company: company.to_string(),
            position: position.to_string(),
            applied_date: date.to_string(),
            status,
            source: "Email".to_string(),
            location: String::new(),
            job_id: String::new(),
            status_link: String::new(),
            notes: "note".to_string(),
        }
    }

    #[test]
    fn test_first_seen_wins() {
        let existing = vec![record(
            "Stryker",
            "SWE Intern",
            "2025-09-01",
            ApplicationStatus::Applied,
        )];
        let new = vec![
            record(" stryker", "swe intern ", "2025-09-01", ApplicationStatus::Interview),
            record("Citadel", "Quant Intern", "2025-09-02", ApplicationStatus::Applied),
        ];

        let merged = merge(existing, new);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].status, ApplicationStatus::Applied);
        assert_eq!(merged[1].company, "Citadel");
    }

    #[test]
    fn test_duplicates_within_new_batch() {
        let new = vec![
            record("Acme", "Dev", "2025-09-01", ApplicationStatus::Applied),
            record("ACME", "DEV", "2025-09-01", ApplicationStatus::Rejected),
        ];
        let merged = merge(Vec::new(), new);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].company, "Acme");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let x = vec![
            record("A", "P1", "2025-09-01", ApplicationStatus::Applied),
            record("B", "P2", "2025-09-02", ApplicationStatus::Offer),
        ];
        let y = vec![
            record("b", "p2", "2025-09-02", ApplicationStatus::Rejected),
            record("C", "P3", "2025-09-03", ApplicationStatus::Applied),
        ];

        let once = merge(x.clone(), y);
        let twice = merge(x, once.clone());
        assert_eq!(once, twice);
    }
}

//! Spreadsheet persistence for application records.

pub mod xlsx;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TableError;
use crate::merge::merge;
use crate::record::ApplicationRecord;
use crate::sanitize::redact_path;

pub use xlsx::{XlsxTable, DEFAULT_SHEET_NAME, HEADERS};

/// How new records combine with an existing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Replace the table with this run's records.
    #[default]
    Overwrite,
    /// Merge this run's records into the existing rows.
    Append,
}

/// Reads and writes whole tables. Implementations must not leave a
/// partially written file behind when `write_table` fails.
pub trait TableStore: Send + Sync {
    fn write_table(&self, records: &[ApplicationRecord], path: &Path) -> Result<(), TableError>;

    fn read_table(&self, path: &Path) -> Result<Vec<ApplicationRecord>, TableError>;

    fn table_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Result of a [`persist`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistOutcome {
    pub path: PathBuf,
    pub mode: WriteMode,
    /// Rows now in the table.
    pub rows_written: usize,
    /// Rows that were not in the table before this call.
    pub rows_added: usize,
    /// New records dropped because an identical row already existed.
    pub duplicates_skipped: usize,
}

/// Writes `records` to `path`. In append mode the existing table (if any) is
/// read, merged with `records` and rewritten wholesale.
pub fn persist(
    store: &dyn TableStore,
    records: &[ApplicationRecord],
    path: &Path,
    mode: WriteMode,
) -> Result<PersistOutcome, TableError> {
    let outcome = match mode {
        WriteMode::Overwrite => {
            store.write_table(records, path)?;
            PersistOutcome {
                path: path.to_path_buf(),
                mode,
                rows_written: records.len(),
                rows_added: records.len(),
                duplicates_skipped: 0,
            }
        }
        WriteMode::Append => {
            let existing = if store.table_exists(path) {
                store.read_table(path)?
            } else {
                debug!(file = %redact_path(path), "No existing table, creating a new one");
                Vec::new()
            };
            let existing_rows = existing.len();
            let merged = merge(existing, records.iter().cloned());
            let rows_added = merged.len().saturating_sub(existing_rows);

            store.write_table(&merged, path)?;
            PersistOutcome {
                path: path.to_path_buf(),
                mode,
                rows_written: merged.len(),
                rows_added,
                duplicates_skipped: records.len().saturating_sub(rows_added),
            }
        }
    };

    info!(
        file = %redact_path(path),
        mode = ?outcome.mode,
        rows = outcome.rows_written,
        added = outcome.rows_added,
        "Table written"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ApplicationStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        tables: Mutex<HashMap<PathBuf, Vec<ApplicationRecord>>>,
    }

    impl TableStore for MemoryStore {
        fn write_table(
            &self,
            records: &[ApplicationRecord],
            path: &Path,
        ) -> Result<(), TableError> {
            self.tables
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), records.to_vec());
            Ok(())
        }

        fn read_table(&self, path: &Path) -> Result<Vec<ApplicationRecord>, TableError> {
            Ok(self
                .tables
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or_default())
        }

        fn table_exists(&self, path: &Path) -> bool {
            self.tables.lock().unwrap().contains_key(path)
        }
    }

    fn record(company: &str, date: &str) -> ApplicationRecord {
        ApplicationRecord {
            company: company.to_string(),
            position: "Software Engineer Intern".to_string(),
            applied_date: date.to_string(),
            status: ApplicationStatus::Applied,
            source: "Email".to_string(),
            location: String::new(),
            job_id: String::new(),
            status_link: String::new(),
            notes: format!("Applied to {}.", company),
        }
    }

    #[test]
    fn test_write_mode_serde() {
        let mode: WriteMode = serde_json::from_str("\"append\"").unwrap();
        assert_eq!(mode, WriteMode::Append);
        assert_eq!(
            serde_json::to_string(&WriteMode::Overwrite).unwrap(),
            "\"overwrite\""
        );
    }

    #[test]
    fn test_overwrite_replaces_rows() {
        let store = MemoryStore::default();
        let path = Path::new("apps.xlsx");
        persist(&store, &[record("Acme", "2025-01-01")], path, WriteMode::Overwrite).unwrap();

        let outcome = persist(
            &store,
            &[record("Globex", "2025-01-02")],
            path,
            WriteMode::Overwrite,
        )
        .unwrap();

        assert_eq!(outcome.rows_written, 1);
        let rows = store.read_table(path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "Globex");
    }

    #[test]
    fn test_append_merges_and_counts_added() {
        let store = MemoryStore::default();
        let path = Path::new("apps.xlsx");
        let existing = vec![record("Acme", "2025-01-01"), record("Globex", "2025-01-02")];
        store.write_table(&existing, path).unwrap();

        let mut duplicate = record("ACME ", "2025-01-01");
        duplicate.notes = "different notes".to_string();
        let new = vec![duplicate, record("Initech", "2025-01-03")];

        let outcome = persist(&store, &new, path, WriteMode::Append).unwrap();
        assert_eq!(outcome.rows_written, 3);
        assert_eq!(outcome.rows_added, 1);
        assert_eq!(outcome.duplicates_skipped, 1);

        let rows = store.read_table(path).unwrap();
        assert_eq!(rows[0].notes, "Applied to Acme.");
        assert_eq!(rows[2].company, "Initech");
    }

    #[test]
    fn test_append_without_existing_table() {
        let store = MemoryStore::default();
        let outcome = persist(
            &store,
            &[record("Acme", "2025-01-01")],
            Path::new("new.xlsx"),
            WriteMode::Append,
        )
        .unwrap();
        assert_eq!(outcome.rows_written, 1);
        assert_eq!(outcome.rows_added, 1);
    }
}

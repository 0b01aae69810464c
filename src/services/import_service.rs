use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;

use crate::dto::import_dto::{ErrorDetail, ImportReport};
use crate::error::{ImportError, Result};
use crate::models::candidate::{Candidate, CandidateStatus, NewCandidate};
use crate::models::user::Advisor;
use crate::services::distribution::distribute;
use crate::services::row_validator::{candidate_phones, validate_rows, ValidRow};
use crate::services::sheet_reader::{self, StagingRow};
use crate::utils::time;

pub const PLACEHOLDER_EMAIL_DOMAIN: &str = "sin-correo.local";

/// Candidate storage used by the import. Each insert commits on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Which of `phones` already belong to stored candidates.
    async fn existing_phones(&self, phones: &[String]) -> Result<HashSet<String>>;

    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate>;
}

/// Source of the advisors that receive imported candidates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvisorDirectory: Send + Sync {
    /// Active users with the advisor role, in a stable order.
    async fn active_advisors(&self) -> Result<Vec<Advisor>>;
}

pub fn placeholder_email(phone: &str) -> String {
    let local: String = phone.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("{}@{}", local, PLACEHOLDER_EMAIL_DOMAIN)
}

fn import_record(row: &ValidRow, advisor: &Advisor) -> NewCandidate {
    NewCandidate {
        name: row.name.clone(),
        email: placeholder_email(&row.phone),
        phone: row.phone.clone(),
        status: CandidateStatus::InProcess,
        position: None,
        notes: None,
        advisor_id: Some(advisor.id),
        registered_at: row.registered_at,
    }
}

#[derive(Clone)]
pub struct ImportService<S, D> {
    store: S,
    directory: D,
    max_error_details: usize,
}

impl<S, D> ImportService<S, D>
where
    S: CandidateStore,
    D: AdvisorDirectory,
{
    pub fn new(store: S, directory: D, max_error_details: usize) -> Self {
        Self {
            store,
            directory,
            max_error_details,
        }
    }

    /// Parses an uploaded workbook and runs it through the import pipeline.
    pub async fn import_workbook(&self, bytes: &[u8]) -> Result<ImportReport> {
        let advisors = self.active_advisors().await?;
        let rows = sheet_reader::read_workbook(bytes)?;
        self.import_rows(&advisors, rows).await
    }

    async fn active_advisors(&self) -> Result<Vec<Advisor>> {
        let advisors = self.directory.active_advisors().await?;
        if advisors.is_empty() {
            tracing::warn!("import refused: no active advisors");
            return Err(ImportError::NoActiveAdvisors.into());
        }
        Ok(advisors)
    }

    /// Validate, distribute and store already-parsed rows.
    pub async fn import_rows(&self, advisors: &[Advisor], rows: Vec<StagingRow>) -> Result<ImportReport> {
        if advisors.is_empty() {
            return Err(ImportError::NoActiveAdvisors.into());
        }

        let total_processed = rows.len();
        let existing = self.store.existing_phones(&candidate_phones(&rows)).await?;
        let outcome = validate_rows(rows, &existing, time::now());

        let mut details: Vec<ErrorDetail> = outcome.rejected.iter().map(ErrorDetail::from).collect();
        let skipped = outcome.rejected.len();

        let plan = distribute(advisors, outcome.accepted)?;
        let mut distribution = BTreeMap::new();
        let mut imported = 0usize;
        let mut failed = 0usize;

        for (advisor, assigned) in plan {
            distribution.insert(advisor.email.clone(), assigned.len());

            for row in assigned {
                match self.store.insert_candidate(import_record(&row, advisor)).await {
                    Ok(candidate) => {
                        imported += 1;
                        tracing::debug!(row = row.row_number, candidate_id = %candidate.id, "imported candidate");
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::warn!(row = row.row_number, phone = %row.phone, error = %e, "failed to store imported candidate");
                        details.push(ErrorDetail {
                            row: row.row_number,
                            reason: format!("could not be saved: {}", e),
                        });
                    }
                }
            }
        }

        details.sort_by_key(|d| d.row);
        details.truncate(self.max_error_details);

        tracing::info!(
            total = total_processed,
            imported,
            skipped,
            failed,
            advisors = advisors.len(),
            "spreadsheet import finished"
        );

        Ok(ImportReport {
            success: true,
            message: format!(
                "Imported {} of {} rows across {} advisors",
                imported,
                total_processed,
                advisors.len()
            ),
            total_processed,
            imported,
            skipped,
            errors: failed,
            distribution,
            error_details: details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::sheet_reader::DateCell;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    fn advisor(email: &str) -> Advisor {
        Advisor {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: None,
        }
    }

    fn staging(n: usize, name: &str, phone: &str) -> StagingRow {
        StagingRow {
            row_number: n,
            name: name.to_string(),
            phone: phone.to_string(),
            created_at: DateCell::Empty,
        }
    }

    fn stored(candidate: &NewCandidate) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            status: candidate.status.as_str().to_string(),
            position: None,
            notes: None,
            folio: "REC-00000000".into(),
            advisor_id: candidate.advisor_id,
            registered_at: candidate.registered_at,
            updated_at: Utc::now(),
        }
    }

    /// Store that remembers every insert and already knows `existing`.
    fn recording_store(existing: &[&str], inserted: Arc<Mutex<Vec<NewCandidate>>>) -> MockCandidateStore {
        let existing: HashSet<String> = existing.iter().map(|p| p.to_string()).collect();
        let mut store = MockCandidateStore::new();
        store.expect_existing_phones().returning(move |phones| {
            Ok(phones.iter().filter(|p| existing.contains(*p)).cloned().collect())
        });
        store.expect_insert_candidate().returning(move |candidate| {
            let row = stored(&candidate);
            inserted.lock().unwrap().push(candidate);
            Ok(row)
        });
        store
    }

    fn directory(advisors: Vec<Advisor>) -> MockAdvisorDirectory {
        let mut directory = MockAdvisorDirectory::new();
        directory
            .expect_active_advisors()
            .returning(move || Ok(advisors.clone()));
        directory
    }

    #[tokio::test]
    async fn distributes_ten_rows_as_four_three_three() {
        let inserted = Arc::new(Mutex::new(Vec::new()));
        let advisors = vec![advisor("a@x.com"), advisor("b@x.com"), advisor("c@x.com")];
        let service = ImportService::new(
            recording_store(&[], inserted.clone()),
            directory(advisors.clone()),
            10,
        );
        let rows = (0..10)
            .map(|i| staging(i + 2, &format!("Recluta {}", i), &format!("55500000{:02}", i)))
            .collect();

        let report = service.import_rows(&advisors, rows).await.unwrap();

        assert!(report.success);
        assert_eq!(report.total_processed, 10);
        assert_eq!(report.imported, 10);
        assert_eq!(report.distribution["a@x.com"], 4);
        assert_eq!(report.distribution["b@x.com"], 3);
        assert_eq!(report.distribution["c@x.com"], 3);

        let inserted = inserted.lock().unwrap();
        let first_block: Vec<_> = inserted[..4].iter().map(|c| c.advisor_id).collect();
        assert!(first_block.iter().all(|id| *id == Some(advisors[0].id)));
        assert!(inserted.iter().all(|c| c.status == CandidateStatus::InProcess));
        assert_eq!(inserted[0].email, "5550000000@sin-correo.local");
    }

    #[tokio::test]
    async fn rejected_rows_are_reported_and_never_assigned() {
        let inserted = Arc::new(Mutex::new(Vec::new()));
        let advisors = vec![advisor("a@x.com"), advisor("b@x.com")];
        let service = ImportService::new(
            recording_store(&["5559876543"], inserted.clone()),
            directory(advisors.clone()),
            10,
        );
        let rows = vec![
            staging(2, "Juan", "5551234567"),
            staging(3, "", "5550001111"),
            staging(4, "María", "5559876543"),
            staging(5, "Carlos", "5551234567"),
            staging(6, "Ana", "5554567890"),
        ];

        let report = service.import_rows(&advisors, rows).await.unwrap();

        assert_eq!(report.total_processed, 5);
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.errors, 0);
        assert_eq!(
            report.error_details,
            vec![
                ErrorDetail { row: 3, reason: "empty name".into() },
                ErrorDetail { row: 4, reason: "phone already registered".into() },
                ErrorDetail { row: 5, reason: "duplicate phone in upload".into() },
            ]
        );
        let phones: Vec<String> = inserted.lock().unwrap().iter().map(|c| c.phone.clone()).collect();
        assert_eq!(phones, vec!["5551234567".to_string(), "5554567890".to_string()]);
    }

    #[tokio::test]
    async fn failed_inserts_do_not_stop_the_batch() {
        let advisors = vec![advisor("a@x.com")];
        let mut store = MockCandidateStore::new();
        store.expect_existing_phones().returning(|_| Ok(HashSet::new()));
        store.expect_insert_candidate().returning(|candidate| {
            if candidate.phone == "5550000002" {
                Err(Error::Conflict("Duplicate value violates candidates_phone_key".into()))
            } else {
                Ok(stored(&candidate))
            }
        });
        let service = ImportService::new(store, directory(advisors.clone()), 10);
        let rows = vec![
            staging(2, "Uno", "5550000001"),
            staging(3, "Dos", "5550000002"),
            staging(4, "Tres", "5550000003"),
        ];

        let report = service.import_rows(&advisors, rows).await.unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.distribution["a@x.com"], 3);
        assert_eq!(report.error_details.len(), 1);
        assert_eq!(report.error_details[0].row, 3);
        assert!(report.error_details[0].reason.contains("candidates_phone_key"));
    }

    #[tokio::test]
    async fn error_details_are_capped() {
        let inserted = Arc::new(Mutex::new(Vec::new()));
        let advisors = vec![advisor("a@x.com")];
        let service = ImportService::new(recording_store(&[], inserted), directory(advisors.clone()), 10);
        let rows = (0..25).map(|i| staging(i + 2, "", "555")).collect();

        let report = service.import_rows(&advisors, rows).await.unwrap();

        assert_eq!(report.skipped, 25);
        assert_eq!(report.error_details.len(), 10);
        assert_eq!(report.error_details[0].row, 2);
    }

    #[tokio::test]
    async fn no_active_advisors_fails_before_touching_storage() {
        let mut store = MockCandidateStore::new();
        store.expect_existing_phones().never();
        store.expect_insert_candidate().never();
        let service = ImportService::new(store, directory(Vec::new()), 10);

        let err = service.import_workbook(b"irrelevant").await.unwrap_err();
        assert!(matches!(err, Error::Import(ImportError::NoActiveAdvisors)));
    }

    #[tokio::test]
    async fn advisors_without_rows_still_appear_in_distribution() {
        let inserted = Arc::new(Mutex::new(Vec::new()));
        let advisors = vec![advisor("a@x.com"), advisor("b@x.com"), advisor("c@x.com")];
        let service = ImportService::new(recording_store(&[], inserted), directory(advisors.clone()), 10);

        let report = service
            .import_rows(&advisors, vec![staging(2, "Solo", "5550000009")])
            .await
            .unwrap();

        assert_eq!(report.distribution.len(), 3);
        assert_eq!(report.distribution["a@x.com"], 1);
        assert_eq!(report.distribution["c@x.com"], 0);
    }

    #[tokio::test]
    async fn imports_an_uploaded_workbook_end_to_end() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Fecha de creación").unwrap();
        sheet.write_string(0, 1, "Nombre").unwrap();
        sheet.write_string(0, 2, "Teléfono").unwrap();
        let data = [
            ("05/06/2025 12:20pm", "Juan Pérez", "5551234567"),
            ("05/06/2025 01:15pm", "María García", "5559876543"),
            ("05/06/2025 02:30pm", "Carlos López", "5555678901"),
            ("05/06/2025 03:45pm", "Ana Martínez", "5554567890"),
            ("05/06/2025 04:20pm", "Luis Rodríguez", "5553456789"),
        ];
        for (i, (date, name, phone)) in data.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_string(r, 0, *date).unwrap();
            sheet.write_string(r, 1, *name).unwrap();
            sheet.write_string(r, 2, *phone).unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let inserted = Arc::new(Mutex::new(Vec::new()));
        let advisors = vec![advisor("a@x.com"), advisor("b@x.com")];
        let service = ImportService::new(recording_store(&[], inserted.clone()), directory(advisors), 10);

        let report = service.import_workbook(&bytes).await.unwrap();

        assert_eq!(report.imported, 5);
        assert_eq!(report.distribution["a@x.com"], 3);
        assert_eq!(report.distribution["b@x.com"], 2);
        let inserted = inserted.lock().unwrap();
        assert_eq!(inserted[0].name, "Juan Pérez");
        assert_eq!(inserted[1].registered_at.format("%Y-%m-%d %H:%M").to_string(), "2025-06-05 13:15");
    }
}

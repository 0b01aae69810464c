use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::dto::import_dto::ErrorDetail;
use crate::services::sheet_reader::{DateCell, StagingRow};
use crate::utils::time::{from_excel_serial, parse_import_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyName,
    EmptyPhone,
    PhoneAlreadyRegistered,
    DuplicateInUpload,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::EmptyName => "empty name",
            RejectReason::EmptyPhone => "empty phone",
            RejectReason::PhoneAlreadyRegistered => "phone already registered",
            RejectReason::DuplicateInUpload => "duplicate phone in upload",
        };
        f.write_str(text)
    }
}

/// A row that passed validation and is ready to be assigned and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRow {
    pub row_number: usize,
    pub name: String,
    pub phone: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub row_number: usize,
    pub reason: RejectReason,
}

impl From<&RejectedRow> for ErrorDetail {
    fn from(rejected: &RejectedRow) -> Self {
        ErrorDetail {
            row: rejected.row_number,
            reason: rejected.reason.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub accepted: Vec<ValidRow>,
    pub rejected: Vec<RejectedRow>,
}

/// Best-effort registration date for a row; `fallback` when nothing parses.
pub fn resolve_date(cell: &DateCell, fallback: DateTime<Utc>) -> DateTime<Utc> {
    let parsed = match cell {
        DateCell::Empty => None,
        DateCell::Text(text) => parse_import_text(text),
        DateCell::Serial(serial) => from_excel_serial(*serial),
    };
    parsed.unwrap_or(fallback)
}

/// Phones of the batch worth checking against storage.
pub fn candidate_phones(rows: &[StagingRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|r| r.phone.trim())
        .filter(|p| !p.is_empty() && seen.insert(*p))
        .map(str::to_string)
        .collect()
}

/// Splits staging rows into accepted and rejected ones. Rejections never
/// stop the batch; the first occurrence of a phone within the upload wins.
pub fn validate_rows(
    rows: Vec<StagingRow>,
    existing_phones: &HashSet<String>,
    now: DateTime<Utc>,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    let mut batch_phones: HashSet<String> = HashSet::new();

    for row in rows {
        let name = row.name.trim();
        let phone = row.phone.trim();

        let rejection = if name.is_empty() {
            Some(RejectReason::EmptyName)
        } else if phone.is_empty() {
            Some(RejectReason::EmptyPhone)
        } else if existing_phones.contains(phone) {
            Some(RejectReason::PhoneAlreadyRegistered)
        } else if batch_phones.contains(phone) {
            Some(RejectReason::DuplicateInUpload)
        } else {
            None
        };

        if let Some(reason) = rejection {
            tracing::debug!(row = row.row_number, %reason, "import row rejected");
            outcome.rejected.push(RejectedRow {
                row_number: row.row_number,
                reason,
            });
            continue;
        }

        batch_phones.insert(phone.to_string());
        outcome.accepted.push(ValidRow {
            row_number: row.row_number,
            name: name.to_string(),
            phone: phone.to_string(),
            registered_at: resolve_date(&row.created_at, now),
        });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn row(n: usize, name: &str, phone: &str) -> StagingRow {
        StagingRow {
            row_number: n,
            name: name.to_string(),
            phone: phone.to_string(),
            created_at: DateCell::Empty,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn missing_name_is_rejected_with_reason() {
        let out = validate_rows(vec![row(2, "   ", "5551234567")], &HashSet::new(), fixed_now());
        assert!(out.accepted.is_empty());
        assert_eq!(out.rejected, vec![RejectedRow { row_number: 2, reason: RejectReason::EmptyName }]);
        assert_eq!(ErrorDetail::from(&out.rejected[0]).reason, "empty name");
    }

    #[test]
    fn missing_phone_is_rejected() {
        let out = validate_rows(vec![row(4, "Ana", " ")], &HashSet::new(), fixed_now());
        assert_eq!(out.rejected[0].reason, RejectReason::EmptyPhone);
    }

    #[test]
    fn duplicate_in_same_upload_keeps_first_occurrence() {
        let rows = vec![
            row(2, "Uno", "5550000001"),
            row(3, "Dos", "5551234567"),
            row(4, "Tres", "5550000002"),
            row(5, "Cuatro", "5550000003"),
            row(6, "Cinco", "5550000004"),
            row(7, "Seis", " 5551234567 "),
        ];
        let out = validate_rows(rows, &HashSet::new(), fixed_now());

        assert_eq!(out.accepted.len(), 5);
        assert!(out.accepted.iter().any(|r| r.row_number == 3));
        assert_eq!(
            out.rejected,
            vec![RejectedRow { row_number: 7, reason: RejectReason::DuplicateInUpload }]
        );
        assert_eq!(out.rejected[0].reason.to_string(), "duplicate phone in upload");
    }

    #[test]
    fn phones_already_stored_are_rejected() {
        let existing: HashSet<String> = ["5559876543".to_string()].into_iter().collect();
        let out = validate_rows(vec![row(2, "María", "5559876543")], &existing, fixed_now());
        assert_eq!(out.rejected[0].reason, RejectReason::PhoneAlreadyRegistered);
    }

    #[test]
    fn rejected_rows_do_not_reserve_their_phone() {
        // An empty-name row must not block a later valid row with the same phone.
        let rows = vec![row(2, "", "5551112222"), row(3, "Luis", "5551112222")];
        let out = validate_rows(rows, &HashSet::new(), fixed_now());
        assert_eq!(out.accepted.len(), 1);
        assert_eq!(out.accepted[0].row_number, 3);
    }

    #[test]
    fn values_are_trimmed_and_dates_parsed() {
        let mut r = row(2, "  Juan Pérez ", " 5551234567 ");
        r.created_at = DateCell::Text("05/06/2025 12:20pm".into());
        let out = validate_rows(vec![r], &HashSet::new(), fixed_now());

        let accepted = &out.accepted[0];
        assert_eq!(accepted.name, "Juan Pérez");
        assert_eq!(accepted.phone, "5551234567");
        assert_eq!(accepted.registered_at.year(), 2025);
    }

    #[test]
    fn unparseable_dates_fall_back_to_import_time() {
        let mut r = row(2, "Ana", "5554567890");
        r.created_at = DateCell::Text("la semana pasada".into());
        let out = validate_rows(vec![r], &HashSet::new(), fixed_now());
        assert_eq!(out.accepted[0].registered_at, fixed_now());

        assert_eq!(resolve_date(&DateCell::Empty, fixed_now()), fixed_now());
    }

    #[test]
    fn candidate_phones_are_trimmed_and_unique() {
        let rows = vec![row(2, "a", " 1 "), row(3, "b", "1"), row(4, "c", ""), row(5, "d", "2")];
        assert_eq!(candidate_phones(&rows), vec!["1".to_string(), "2".to_string()]);
    }
}

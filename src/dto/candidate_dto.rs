use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    pub notes: Option<String>,
    pub advisor_id: Option<uuid::Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    pub notes: Option<String>,
    pub advisor_id: Option<uuid::Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateList {
    pub items: Vec<Candidate>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkExportRequest {
    pub candidate_ids: Option<Vec<uuid::Uuid>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateStats {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_rejects_bad_email_and_short_phone() {
        let payload = CreateCandidatePayload {
            name: "Juan Pérez".into(),
            email: "not-an-email".into(),
            phone: "123".into(),
            status: None,
            position: None,
            notes: None,
            advisor_id: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateCandidatePayload::default().validate().is_ok());
    }
}

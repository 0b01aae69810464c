use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// What a candidate sees when looking up their folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub folio: String,
    pub name: String,
    pub status: String,
    pub status_label: String,
    pub position: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub next_interview: Option<NextInterview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextInterview {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: String,
    pub kind_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStage {
    Received,
    Review,
    Interview,
    Evaluation,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub stage: TimelineStage,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub active: bool,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub folio: String,
    pub name: String,
    pub status: String,
    pub status_label: String,
    pub stage: TimelineStage,
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolioCheckResponse {
    pub success: bool,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecoverFolioRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverFolioResponse {
    pub folio: String,
}

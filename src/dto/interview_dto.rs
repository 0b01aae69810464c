use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInterviewPayload {
    pub candidate_id: Uuid,
    pub date: NaiveDate,
    /// `HH:MM`, 24-hour clock.
    #[validate(length(min = 4, max = 8))]
    pub time: String,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: Option<i32>,
    pub kind: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateInterviewPayload {
    pub date: Option<NaiveDate>,
    #[validate(length(min = 4, max = 8))]
    pub time: Option<String>,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: Option<i32>,
    pub kind: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewListQuery {
    pub candidate_id: Option<Uuid>,
    pub status: Option<String>,
}

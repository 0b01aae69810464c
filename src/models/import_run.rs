use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImportRun {
    pub id: Uuid,
    pub started_by: Option<Uuid>,
    pub file_name: String,
    pub total_rows: i32,
    pub imported_rows: i32,
    pub skipped_rows: i32,
    pub failed_rows: i32,
    pub distribution: JsonValue,
    pub error_details: JsonValue,
    pub created_at: DateTime<Utc>,
}

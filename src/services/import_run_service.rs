use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::import_dto::ImportReport;
use crate::error::Result;
use crate::models::import_run::ImportRun;

pub const DEFAULT_RUN_LIMIT: i64 = 20;

/// Audit trail of spreadsheet imports.
#[derive(Clone)]
pub struct ImportRunService {
    pool: PgPool,
}

impl ImportRunService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, started_by: Option<Uuid>, file_name: &str, report: &ImportReport) -> Result<ImportRun> {
        let run = sqlx::query_as::<_, ImportRun>(
            r#"
            INSERT INTO import_runs (started_by, file_name, total_rows, imported_rows, skipped_rows, failed_rows, distribution, error_details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, started_by, file_name, total_rows, imported_rows, skipped_rows, failed_rows, distribution, error_details, created_at
            "#,
        )
        .bind(started_by)
        .bind(file_name)
        .bind(report.total_processed as i32)
        .bind(report.imported as i32)
        .bind(report.skipped as i32)
        .bind(report.errors as i32)
        .bind(serde_json::to_value(&report.distribution)?)
        .bind(serde_json::to_value(&report.error_details)?)
        .fetch_one(&self.pool)
        .await?;
        Ok(run)
    }

    pub async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<ImportRun>> {
        let limit = limit.unwrap_or(DEFAULT_RUN_LIMIT).clamp(1, 100);
        let runs = sqlx::query_as::<_, ImportRun>(
            r#"
            SELECT id, started_by, file_name, total_rows, imported_rows, skipped_rows, failed_rows, distribution, error_details, created_at
            FROM import_runs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(runs)
    }
}

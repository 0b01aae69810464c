use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::interview_dto::{CreateInterviewPayload, InterviewListQuery, UpdateInterviewPayload};
use crate::error::{Error, Result};
use crate::models::interview::{
    Interview, InterviewChanges, InterviewKind, InterviewStatus, NewInterview,
};
use crate::utils::time::parse_clock_time;
use crate::utils::validation::non_blank;

const INTERVIEW_COLUMNS: &str = "i.id, i.candidate_id, c.name AS candidate_name, i.scheduled_on, i.starts_at, i.duration_minutes, i.kind, i.location, i.notes, i.status, i.created_at, i.updated_at";

pub const DEFAULT_DURATION_MINUTES: i32 = 60;

#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
}

impl InterviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Interviews in calendar order. `advisor_scope` keeps only interviews of
    /// that advisor's candidates.
    pub async fn list(&self, query: &InterviewListQuery, advisor_scope: Option<Uuid>) -> Result<Vec<Interview>> {
        let status = match non_blank(query.status.clone()) {
            Some(raw) => Some(raw.parse::<InterviewStatus>().map_err(Error::BadRequest)?),
            None => None,
        };

        let interviews = sqlx::query_as::<_, Interview>(&format!(
            r#"
            SELECT {}
            FROM interviews i
            JOIN candidates c ON c.id = i.candidate_id
            WHERE ($1::uuid IS NULL OR c.advisor_id = $1)
              AND ($2::uuid IS NULL OR i.candidate_id = $2)
              AND ($3::text IS NULL OR i.status = $3)
            ORDER BY i.scheduled_on, i.starts_at, i.id
            "#,
            INTERVIEW_COLUMNS
        ))
        .bind(advisor_scope)
        .bind(query.candidate_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    pub async fn get(&self, id: Uuid, advisor_scope: Option<Uuid>) -> Result<Interview> {
        sqlx::query_as::<_, Interview>(&format!(
            r#"
            SELECT {}
            FROM interviews i
            JOIN candidates c ON c.id = i.candidate_id
            WHERE i.id = $1 AND ($2::uuid IS NULL OR c.advisor_id = $2)
            "#,
            INTERVIEW_COLUMNS
        ))
        .bind(id)
        .bind(advisor_scope)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Interview {} not found", id)))
    }

    /// Schedules a pending interview. The caller checks the candidate is
    /// visible to them first.
    pub async fn create(&self, new: NewInterview) -> Result<Interview> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            r#"
            WITH saved AS (
                INSERT INTO interviews (candidate_id, scheduled_on, starts_at, duration_minutes, kind, location, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {}
            FROM saved i
            JOIN candidates c ON c.id = i.candidate_id
            "#,
            INTERVIEW_COLUMNS
        ))
        .bind(new.candidate_id)
        .bind(new.scheduled_on)
        .bind(new.starts_at)
        .bind(new.duration_minutes)
        .bind(new.kind.as_str())
        .bind(&new.location)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            interview_id = %interview.id,
            candidate_id = %interview.candidate_id,
            date = %interview.scheduled_on,
            "interview scheduled"
        );
        Ok(interview)
    }

    pub async fn update(&self, id: Uuid, changes: InterviewChanges, advisor_scope: Option<Uuid>) -> Result<Interview> {
        let updated = sqlx::query_as::<_, Interview>(&format!(
            r#"
            WITH saved AS (
                UPDATE interviews SET
                    scheduled_on = COALESCE($3, scheduled_on),
                    starts_at = COALESCE($4, starts_at),
                    duration_minutes = COALESCE($5, duration_minutes),
                    kind = COALESCE($6, kind),
                    location = COALESCE($7, location),
                    notes = COALESCE($8, notes),
                    status = COALESCE($9, status),
                    updated_at = NOW()
                WHERE id = $1
                  AND ($2::uuid IS NULL OR candidate_id IN (SELECT id FROM candidates WHERE advisor_id = $2))
                RETURNING *
            )
            SELECT {}
            FROM saved i
            JOIN candidates c ON c.id = i.candidate_id
            "#,
            INTERVIEW_COLUMNS
        ))
        .bind(id)
        .bind(advisor_scope)
        .bind(changes.scheduled_on)
        .bind(changes.starts_at)
        .bind(changes.duration_minutes)
        .bind(changes.kind.map(|k| k.as_str()))
        .bind(changes.location)
        .bind(changes.notes)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Interview {} not found", id)))?;

        tracing::info!(interview_id = %id, status = %updated.status, "interview updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, advisor_scope: Option<Uuid>) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM interviews
            WHERE id = $1
              AND ($2::uuid IS NULL OR candidate_id IN (SELECT id FROM candidates WHERE advisor_id = $2))
            "#,
        )
        .bind(id)
        .bind(advisor_scope)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Interview {} not found", id)));
        }
        tracing::info!(interview_id = %id, "interview deleted");
        Ok(())
    }

    /// Every interview of one candidate, in calendar order.
    pub async fn for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Interview>> {
        self.list(
            &InterviewListQuery {
                candidate_id: Some(candidate_id),
                status: None,
            },
            None,
        )
        .await
    }

    /// Earliest pending interview from today on.
    pub async fn next_pending(&self, candidate_id: Uuid) -> Result<Option<Interview>> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            r#"
            SELECT {}
            FROM interviews i
            JOIN candidates c ON c.id = i.candidate_id
            WHERE i.candidate_id = $1 AND i.status = $2 AND i.scheduled_on >= CURRENT_DATE
            ORDER BY i.scheduled_on, i.starts_at
            LIMIT 1
            "#,
            INTERVIEW_COLUMNS
        ))
        .bind(candidate_id)
        .bind(InterviewStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(interview)
    }
}

fn parse_time(raw: &str) -> Result<chrono::NaiveTime> {
    parse_clock_time(raw)
        .ok_or_else(|| Error::BadRequest(format!("Invalid interview time '{}', expected HH:MM", raw.trim())))
}

fn parse_kind(raw: Option<String>) -> Result<Option<InterviewKind>> {
    match non_blank(raw) {
        Some(raw) => Ok(Some(raw.parse::<InterviewKind>().map_err(Error::BadRequest)?)),
        None => Ok(None),
    }
}

impl TryFrom<CreateInterviewPayload> for NewInterview {
    type Error = Error;

    fn try_from(payload: CreateInterviewPayload) -> Result<Self> {
        Ok(Self {
            candidate_id: payload.candidate_id,
            scheduled_on: payload.date,
            starts_at: parse_time(&payload.time)?,
            duration_minutes: payload.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            kind: parse_kind(payload.kind)?.unwrap_or(InterviewKind::InPerson),
            location: non_blank(payload.location),
            notes: non_blank(payload.notes),
        })
    }
}

impl TryFrom<UpdateInterviewPayload> for InterviewChanges {
    type Error = Error;

    fn try_from(payload: UpdateInterviewPayload) -> Result<Self> {
        let starts_at = match non_blank(payload.time) {
            Some(raw) => Some(parse_time(&raw)?),
            None => None,
        };
        let status = match non_blank(payload.status) {
            Some(raw) => Some(raw.parse::<InterviewStatus>().map_err(Error::BadRequest)?),
            None => None,
        };
        Ok(Self {
            scheduled_on: payload.date,
            starts_at,
            duration_minutes: payload.duration_minutes,
            kind: parse_kind(payload.kind)?,
            location: payload.location,
            notes: payload.notes,
            status,
        })
    }
}

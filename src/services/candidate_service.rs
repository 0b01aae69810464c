use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::candidate_dto::{
    CandidateList, CandidateListQuery, CandidateStats, StatusCount, UpdateCandidatePayload,
};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus, NewCandidate};
use crate::services::import_service::CandidateStore;
use crate::utils::folio::generate_folio;
use crate::utils::validation::non_blank;

const CANDIDATE_COLUMNS: &str = "id, name, email, phone, status, position, notes, folio, advisor_id, registered_at, updated_at";

const FOLIO_ATTEMPTS: usize = 5;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts one candidate in its own transaction, drawing a fresh folio
    /// until one is free.
    pub async fn create(&self, new: NewCandidate) -> Result<Candidate> {
        let mut tx = self.pool.begin().await?;

        for _ in 0..FOLIO_ATTEMPTS {
            let folio = generate_folio();
            let inserted = sqlx::query_as::<_, Candidate>(&format!(
                r#"
                INSERT INTO candidates (name, email, phone, status, position, notes, folio, advisor_id, registered_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (folio) DO NOTHING
                RETURNING {}
                "#,
                CANDIDATE_COLUMNS
            ))
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(new.status.as_str())
            .bind(&new.position)
            .bind(&new.notes)
            .bind(&folio)
            .bind(new.advisor_id)
            .bind(new.registered_at)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(candidate) = inserted {
                tx.commit().await?;
                return Ok(candidate);
            }
            tracing::debug!(folio = %folio, "folio collision, retrying");
        }

        Err(Error::Internal("Could not allocate a unique folio".to_string()))
    }

    pub async fn phone_exists(&self, phone: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM candidates WHERE phone = $1)")
            .bind(phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Paginated listing. `advisor_scope` limits results to one advisor's
    /// candidates.
    pub async fn list(&self, query: &CandidateListQuery, advisor_scope: Option<Uuid>) -> Result<CandidateList> {
        let (page, per_page, offset) = page_window(query.page, query.per_page)?;

        let search = non_blank(query.search.clone()).map(|s| format!("%{}%", s));
        let status = match non_blank(query.status.clone()) {
            Some(raw) => Some(raw.parse::<CandidateStatus>().map_err(Error::BadRequest)?),
            None => None,
        };
        let status_code = status.map(|s| s.as_str());

        let filters = r#"
            WHERE ($1::uuid IS NULL OR advisor_id = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR (name ILIKE $3 OR email ILIKE $3 OR phone ILIKE $3 OR position ILIKE $3))
        "#;

        let items = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates {} ORDER BY registered_at DESC, id LIMIT $4 OFFSET $5",
            CANDIDATE_COLUMNS, filters
        ))
        .bind(advisor_scope)
        .bind(status_code)
        .bind(&search)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM candidates {}", filters))
            .bind(advisor_scope)
            .bind(status_code)
            .bind(&search)
            .fetch_one(&self.pool)
            .await?;

        Ok(CandidateList {
            items,
            total,
            page,
            per_page,
            pages: (total + per_page - 1) / per_page,
        })
    }

    pub async fn get(&self, id: Uuid, advisor_scope: Option<Uuid>) -> Result<Candidate> {
        sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates WHERE id = $1 AND ($2::uuid IS NULL OR advisor_id = $2)",
            CANDIDATE_COLUMNS
        ))
        .bind(id)
        .bind(advisor_scope)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateCandidatePayload,
        advisor_scope: Option<Uuid>,
    ) -> Result<Candidate> {
        let status = match non_blank(payload.status) {
            Some(raw) => Some(raw.parse::<CandidateStatus>().map_err(Error::BadRequest)?),
            None => None,
        };

        let updated = sqlx::query_as::<_, Candidate>(&format!(
            r#"
            UPDATE candidates SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                status = COALESCE($6, status),
                position = COALESCE($7, position),
                notes = COALESCE($8, notes),
                advisor_id = COALESCE($9, advisor_id),
                updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR advisor_id = $2)
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        ))
        .bind(id)
        .bind(advisor_scope)
        .bind(non_blank(payload.name))
        .bind(non_blank(payload.email))
        .bind(non_blank(payload.phone))
        .bind(status.map(|s| s.as_str()))
        .bind(payload.position)
        .bind(payload.notes)
        .bind(payload.advisor_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?;

        tracing::info!(candidate_id = %id, status = %updated.status, "candidate updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Candidate {} not found", id)));
        }
        tracing::info!(candidate_id = %id, "candidate deleted");
        Ok(())
    }

    pub async fn find_by_folio(&self, folio: &str) -> Result<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates WHERE folio = $1",
            CANDIDATE_COLUMNS
        ))
        .bind(folio)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    pub async fn folio_exists(&self, folio: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM candidates WHERE folio = $1)")
            .bind(folio)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn find_by_email_and_phone(&self, email: &str, phone: &str) -> Result<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates WHERE LOWER(email) = LOWER($1) AND phone = $2",
            CANDIDATE_COLUMNS
        ))
        .bind(email.trim())
        .bind(phone.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    /// Candidates for export: the given ids, or everyone when `ids` is `None`.
    pub async fn list_for_export(&self, ids: Option<&[Uuid]>) -> Result<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates WHERE ($1::uuid[] IS NULL OR id = ANY($1)) ORDER BY registered_at, id",
            CANDIDATE_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    pub async fn stats(&self) -> Result<CandidateStats> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM candidates GROUP BY status")
                .fetch_all(&self.pool)
                .await?;
        Ok(build_stats(&rows))
    }
}

/// Resolves `(page, per_page, offset)`; pages past the addressable range are
/// rejected instead of overflowing the offset.
pub fn page_window(page: Option<i64>, per_page: Option<i64>) -> Result<(i64, i64, i64)> {
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let page = page.unwrap_or(1).max(1);
    let offset = (page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| Error::BadRequest(format!("Page {} is out of range", page)))?;
    Ok((page, per_page, offset))
}

/// Counts per known status, zero-filled, in pipeline order.
pub fn build_stats(rows: &[(String, i64)]) -> CandidateStats {
    let by_status = CandidateStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: status.as_str().to_string(),
            label: status.label().to_string(),
            count: rows
                .iter()
                .filter(|(code, _)| code == status.as_str())
                .map(|(_, n)| *n)
                .sum(),
        })
        .collect();

    CandidateStats {
        total: rows.iter().map(|(_, n)| *n).sum(),
        by_status,
    }
}

#[async_trait]
impl CandidateStore for CandidateService {
    async fn existing_phones(&self, phones: &[String]) -> Result<HashSet<String>> {
        if phones.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<String> = sqlx::query_scalar("SELECT phone FROM candidates WHERE phone = ANY($1)")
            .bind(phones)
            .fetch_all(&self.pool)
            .await?;
        Ok(found.into_iter().collect())
    }

    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate> {
        self.create(candidate).await
    }
}

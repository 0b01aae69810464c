use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::role::Role;
use crate::models::user::Advisor;
use crate::services::import_service::AdvisorDirectory;

#[derive(Clone)]
pub struct AdvisorService {
    pool: PgPool,
}

impl AdvisorService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<Advisor>> {
        let advisors = sqlx::query_as::<_, Advisor>(
            r#"
            SELECT id, email, name
            FROM users
            WHERE role = $1 AND is_active = TRUE
            ORDER BY created_at, email
            "#,
        )
        .bind(Role::Advisor.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(advisors)
    }

    /// The user with this id, provided it is an active advisor.
    pub async fn find_active(&self, id: Uuid) -> Result<Option<Advisor>> {
        let advisor = sqlx::query_as::<_, Advisor>(
            "SELECT id, email, name FROM users WHERE id = $1 AND role = $2 AND is_active = TRUE",
        )
        .bind(id)
        .bind(Role::Advisor.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(advisor)
    }

    /// Fails with a bad request unless `id` names an active advisor.
    pub async fn ensure_assignable(&self, id: Uuid) -> Result<Advisor> {
        self.find_active(id).await?.ok_or_else(|| {
            Error::BadRequest(format!("User {} is not an active advisor", id))
        })
    }

    /// Emails of every user, keyed by id, for labelling exported rows.
    pub async fn email_map(&self) -> Result<HashMap<Uuid, String>> {
        let rows: Vec<(Uuid, String)> = sqlx::query_as("SELECT id, email FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}

#[async_trait]
impl AdvisorDirectory for AdvisorService {
    async fn active_advisors(&self) -> Result<Vec<Advisor>> {
        self.list_active().await
    }
}

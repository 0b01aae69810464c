use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An active advisor eligible to receive imported candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Advisor {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

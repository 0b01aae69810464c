use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Pipeline stage of a recruit. Stored as its snake_case code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Active,
    InProcess,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 3] = [Self::Active, Self::InProcess, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InProcess => "in_process",
            Self::Rejected => "rejected",
        }
    }

    /// Label shown to recruiters and to candidates on the tracking page.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::InProcess => "En proceso",
            Self::Rejected => "Rechazado",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activo" => Ok(Self::Active),
            "in_process" | "en proceso" => Ok(Self::InProcess),
            "rejected" | "rechazado" => Ok(Self::Rejected),
            other => Err(format!("Unknown candidate status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub folio: String,
    pub advisor_id: Option<Uuid>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn status(&self) -> Option<CandidateStatus> {
        self.status.parse().ok()
    }
}

/// Insert payload shared by manual creation and spreadsheet imports.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: CandidateStatus,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub advisor_id: Option<Uuid>,
    pub registered_at: DateTime<Utc>,
}

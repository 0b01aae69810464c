use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewKind {
    InPerson,
    Virtual,
    Phone,
}

impl InterviewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPerson => "in_person",
            Self::Virtual => "virtual",
            Self::Phone => "phone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InPerson => "Presencial",
            Self::Virtual => "Virtual",
            Self::Phone => "Telefónica",
        }
    }
}

impl fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_person" | "presencial" => Ok(Self::InPerson),
            "virtual" => Ok(Self::Virtual),
            "phone" | "telefonica" | "telefónica" => Ok(Self::Phone),
            other => Err(format!("Unknown interview type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Pending,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(Self::Pending),
            "completed" | "completada" => Ok(Self::Completed),
            "cancelled" | "cancelada" => Ok(Self::Cancelled),
            other => Err(format!("Unknown interview status: {}", other)),
        }
    }
}

/// A scheduled interview, joined with the candidate's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub scheduled_on: NaiveDate,
    pub starts_at: NaiveTime,
    pub duration_minutes: i32,
    pub kind: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Interview {
    pub fn kind(&self) -> Option<InterviewKind> {
        self.kind.parse().ok()
    }

    pub fn status(&self) -> Option<InterviewStatus> {
        self.status.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInterview {
    pub candidate_id: Uuid,
    pub scheduled_on: NaiveDate,
    pub starts_at: NaiveTime,
    pub duration_minutes: i32,
    pub kind: InterviewKind,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Fields to overwrite on an existing interview; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewChanges {
    pub scheduled_on: Option<NaiveDate>,
    pub starts_at: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub kind: Option<InterviewKind>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: Option<InterviewStatus>,
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// Set of actions a role may perform, resolved at compile time per [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities(u16);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const IMPORT_SPREADSHEET: Self = Self(1 << 0);
    pub const VIEW_ALL_CANDIDATES: Self = Self(1 << 1);
    pub const MANAGE_CANDIDATES: Self = Self(1 << 2);
    pub const DELETE_CANDIDATES: Self = Self(1 << 3);
    pub const EXPORT_CANDIDATES: Self = Self(1 << 4);
    pub const MANAGE_ADVISORS: Self = Self(1 << 5);
    pub const VIEW_STATS: Self = Self(1 << 6);
    pub const SCHEDULE_INTERVIEWS: Self = Self(1 << 7);
    pub const ALL: Self = Self(
        Self::IMPORT_SPREADSHEET.0
            | Self::VIEW_ALL_CANDIDATES.0
            | Self::MANAGE_CANDIDATES.0
            | Self::DELETE_CANDIDATES.0
            | Self::EXPORT_CANDIDATES.0
            | Self::MANAGE_ADVISORS.0
            | Self::VIEW_STATS.0
            | Self::SCHEDULE_INTERVIEWS.0,
    );

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Advisor,
}

impl Role {
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Role::Admin => Capabilities::ALL,
            Role::Advisor => Capabilities::MANAGE_CANDIDATES.union(Capabilities::SCHEDULE_INTERVIEWS),
        }
    }

    pub const fn can(self, capability: Capabilities) -> bool {
        self.capabilities().contains(capability)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Advisor => "advisor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "asesor" is the Spanish name of the advisor role.
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "advisor" | "asesor" => Ok(Role::Advisor),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

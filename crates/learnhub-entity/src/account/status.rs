//! Account status and restriction duration enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an account, maintained by administrative modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Account is in good standing.
    #[default]
    Active,
    /// Account is suspended, permanently or until a date.
    Suspended,
    /// Account is banned.
    Banned,
    /// Account was deleted.
    Deleted,
    /// Account is blocked.
    Blocked,
}

impl AccountStatus {
    /// Check if the account may authenticate with this status.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the status as an upper-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Banned => "BANNED",
            Self::Deleted => "DELETED",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = learnhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            "BANNED" => Ok(Self::Banned),
            "DELETED" => Ok(Self::Deleted),
            "BLOCKED" => Ok(Self::Blocked),
            _ => Err(learnhub_core::AppError::validation(format!(
                "Invalid account status: '{s}'"
            ))),
        }
    }
}

/// Duration kind of a suspension or ban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "restriction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestrictionType {
    /// No end date.
    Permanent,
    /// Lifted at `restricted_until`.
    Temporary,
}

impl RestrictionType {
    /// Return the restriction type as an upper-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "PERMANENT",
            Self::Temporary => "TEMPORARY",
        }
    }
}

impl fmt::Display for RestrictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

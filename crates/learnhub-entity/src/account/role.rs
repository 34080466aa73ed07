//! Account role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles an account can hold.
///
/// `Student` is the base end-user role; every other role may reach the
/// administrative dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    /// End user consuming courses and content.
    #[default]
    Student,
    /// Creates and manages courses.
    Instructor,
    /// Moderates content and reports.
    Moderator,
    /// Full system administrator.
    Admin,
}

impl AccountRole {
    /// Check if this role is the base end-user role.
    pub fn is_student(&self) -> bool {
        matches!(self, Self::Student)
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as an upper-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Instructor => "INSTRUCTOR",
            Self::Moderator => "MODERATOR",
            Self::Admin => "ADMIN",
        }
    }

    /// Return the authority string derived from this role (`ROLE_<NAME>`).
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = learnhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STUDENT" => Ok(Self::Student),
            "INSTRUCTOR" => Ok(Self::Instructor),
            "MODERATOR" => Ok(Self::Moderator),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(learnhub_core::AppError::validation(format!(
                "Invalid account role: '{s}'. Expected one of: student, instructor, moderator, admin"
            ))),
        }
    }
}

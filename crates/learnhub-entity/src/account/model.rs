//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::AccountRole;
use super::status::{AccountStatus, RestrictionType};

/// A registered account.
///
/// Status and restriction metadata are written by administrative modules;
/// the authentication subsystem only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Login email, stored lowercase.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role.
    pub role: AccountRole,
    /// Account status.
    pub status: AccountStatus,

    // -- Suspension / ban metadata --
    /// Human reason given for the restriction.
    pub restriction_reason: Option<String>,
    /// Whether the restriction is permanent or temporary.
    pub restriction_type: Option<RestrictionType>,
    /// When a temporary restriction ends.
    pub restricted_until: Option<DateTime<Utc>>,
    /// Who applied the restriction.
    pub restricted_by: Option<String>,
    /// When the restriction was applied.
    pub restricted_at: Option<DateTime<Utc>>,

    /// Maximum number of concurrent device sessions (0 = unlimited).
    pub max_devices: i32,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Builds a fresh, active account from creation data.
    pub fn from_create(data: CreateAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: data.email,
            username: data.username,
            password_hash: data.password_hash,
            role: data.role,
            status: AccountStatus::Active,
            restriction_reason: None,
            restriction_type: None,
            restricted_until: None,
            restricted_by: None,
            restricted_at: None,
            max_devices: data.max_devices,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this account has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns the device limit, or `None` when unlimited.
    pub fn device_limit(&self) -> Option<usize> {
        (self.max_devices > 0).then_some(self.max_devices as usize)
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Login email (already normalized).
    pub email: String,
    /// Display name.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: AccountRole,
    /// Device limit.
    pub max_devices: i32,
}

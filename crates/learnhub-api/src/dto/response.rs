//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use learnhub_auth::SecurityContext;
use learnhub_entity::account::{Account, AccountRole, AccountStatus};
use learnhub_entity::session::Session;

/// Simple message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of signing out everywhere.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutAllResponse {
    /// Number of sessions ended.
    pub count: u64,
}

/// Account summary for responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: AccountRole,
    pub status: AccountStatus,
    pub max_devices: i32,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            username: account.username,
            role: account.role,
            status: account.status,
            max_devices: account.max_devices,
            last_login_at: account.last_login_at,
            created_at: account.created_at,
        }
    }
}

/// The caller's identity as seen by the gate, plus their account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// Security context of this request.
    pub context: SecurityContext,
    /// Account summary.
    pub account: AccountResponse,
}

/// A live session, without its token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub device_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whether this is the session behind the calling token.
    pub current: bool,
}

impl SessionResponse {
    /// Builds the response, marking the session bound to `current_device`.
    pub fn from_session(session: Session, current_device: Option<&str>) -> Self {
        let current = current_device.is_some_and(|d| session.is_for_device(d));
        Self {
            id: session.id,
            device_id: session.device_id,
            user_agent: session.user_agent,
            ip_address: session.ip_address,
            issued_at: session.issued_at,
            last_used_at: session.last_used_at,
            expires_at: session.expires_at,
            current,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Cache state.
    pub cache: CacheHealth,
}

/// Cache section of the health response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    /// Active provider name.
    pub provider: String,
    /// Whether the cache answered a ping.
    pub reachable: bool,
    /// Whether revocation checks are currently enforced.
    pub revocation_available: bool,
}

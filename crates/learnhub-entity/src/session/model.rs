//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A refresh session, one row per device login.
///
/// The device identifier is written at creation and never inferred later;
/// at most one row exists per `(account_id, device_id)` when a device is
/// present.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// Opaque session (refresh) token.
    #[serde(skip_serializing)]
    pub token: String,
    /// The account this session belongs to.
    pub account_id: Uuid,
    /// Client-supplied device identifier.
    pub device_id: Option<String>,
    /// User-Agent header value at login.
    pub user_agent: Option<String>,
    /// Origin IP address at login.
    pub ip_address: Option<String>,
    /// When the session was created.
    pub issued_at: DateTime<Utc>,
    /// Last time the session backed an authenticated request.
    pub last_used_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session is past its expiry.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against an explicit instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Check whether the session is bound to the given device.
    pub fn is_for_device(&self, device_id: &str) -> bool {
        self.device_id.as_deref() == Some(device_id)
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Opaque session token.
    pub token: String,
    /// The account this session belongs to.
    pub account_id: Uuid,
    /// Device identifier.
    pub device_id: Option<String>,
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

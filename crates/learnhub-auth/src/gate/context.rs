//! Per-request security context.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use learnhub_entity::account::AccountRole;

use crate::jwt::Claims;

/// Identity established by the gate for one request.
///
/// Handed to downstream handlers explicitly; nothing about the caller is
/// kept anywhere else.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    /// Authenticated account.
    pub account_id: Uuid,
    /// Account email.
    pub email: String,
    /// Current account role.
    pub role: AccountRole,
    /// Authorities derived from the role.
    pub authorities: Vec<String>,
    /// Device the access token is bound to.
    pub device_id: Option<String>,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// When the gate accepted the request.
    pub request_time: DateTime<Utc>,
    /// Raw access token.
    #[serde(skip)]
    pub token: String,
    /// Verified claims of the access token.
    #[serde(skip)]
    pub claims: Claims,
}

impl SecurityContext {
    /// Returns `true` if the context carries the given authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Returns `true` for administrators.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

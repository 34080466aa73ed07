//! JWT claims structure embedded in every access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_entity::account::AccountRole;

use crate::revocation::DeviceKey;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account ID.
    pub sub: Uuid,
    /// Account role at the time of issuance.
    pub role: AccountRole,
    /// Device the token was issued to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token ID.
    pub jti: Uuid,
}

impl Claims {
    /// Builds a claim set, rejecting one that expires before it is issued.
    pub fn new(
        sub: Uuid,
        role: AccountRole,
        device_id: Option<String>,
        iat: i64,
        exp: i64,
    ) -> Result<Self, AppError> {
        if exp <= iat {
            return Err(AppError::validation(format!(
                "Token expiry ({exp}) must be after its issue time ({iat})"
            )));
        }
        Ok(Self {
            sub,
            role,
            device_id,
            iat,
            exp,
            jti: Uuid::new_v4(),
        })
    }

    /// Returns the account ID from the subject claim.
    pub fn account_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the device claim.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// The device this token was issued to, scoped to its account.
    pub fn device_key(&self) -> Option<DeviceKey<'_>> {
        self.device_id().map(|device| DeviceKey::new(self.sub, device))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Seconds left until expiry, negative once expired.
    pub fn remaining_seconds(&self) -> i64 {
        self.exp - Utc::now().timestamp()
    }
}

//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Smallest accepted access token lifetime (1 minute).
pub const MIN_ACCESS_TOKEN_TTL_MS: u64 = 60_000;
/// Largest accepted access token lifetime (1 day).
pub const MAX_ACCESS_TOKEN_TTL_MS: u64 = 86_400_000;
/// Smallest accepted session lifetime (1 hour).
pub const MIN_SESSION_TTL_MS: u64 = 3_600_000;
/// Largest accepted session lifetime (30 days).
pub const MAX_SESSION_TTL_MS: u64 = 2_592_000_000;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Initial access token TTL in milliseconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_ms: u64,
    /// Initial session (refresh) token TTL in milliseconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_ms: u64,
    /// TTL of the per-device token index in seconds.
    #[serde(default = "default_device_index_ttl")]
    pub device_token_index_ttl_seconds: u64,
    /// Path prefix of the administrative dashboard API.
    #[serde(default = "default_admin_prefix")]
    pub admin_path_prefix: String,
    /// Path of the token refresh endpoint, which bypasses the gate.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Device limit assigned to newly registered accounts (0 = unlimited).
    #[serde(default = "default_max_devices")]
    pub default_max_devices: i32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_ttl_ms: default_access_ttl(),
            session_ttl_ms: default_session_ttl(),
            device_token_index_ttl_seconds: default_device_index_ttl(),
            admin_path_prefix: default_admin_prefix(),
            refresh_path: default_refresh_path(),
            password_min_length: default_password_min(),
            default_max_devices: default_max_devices(),
        }
    }
}

impl AuthConfig {
    /// Checks the configured values against the accepted bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        validate_access_ttl(self.access_token_ttl_ms)?;
        validate_session_ttl(self.session_ttl_ms)?;
        Ok(())
    }
}

/// Rejects an access token TTL outside `[1 minute, 1 day]`.
pub fn validate_access_ttl(ttl_ms: u64) -> Result<(), AppError> {
    if !(MIN_ACCESS_TOKEN_TTL_MS..=MAX_ACCESS_TOKEN_TTL_MS).contains(&ttl_ms) {
        return Err(AppError::configuration(format!(
            "Access token TTL must be between {MIN_ACCESS_TOKEN_TTL_MS} and \
             {MAX_ACCESS_TOKEN_TTL_MS} ms, got {ttl_ms}"
        )));
    }
    Ok(())
}

/// Rejects a session TTL outside `[1 hour, 30 days]`.
pub fn validate_session_ttl(ttl_ms: u64) -> Result<(), AppError> {
    if !(MIN_SESSION_TTL_MS..=MAX_SESSION_TTL_MS).contains(&ttl_ms) {
        return Err(AppError::configuration(format!(
            "Session TTL must be between {MIN_SESSION_TTL_MS} and \
             {MAX_SESSION_TTL_MS} ms, got {ttl_ms}"
        )));
    }
    Ok(())
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    600_000
}

fn default_session_ttl() -> u64 {
    604_800_000
}

fn default_device_index_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_admin_prefix() -> String {
    "/admin".to_string()
}

fn default_refresh_path() -> String {
    "/auth/refresh-token".to_string()
}

fn default_password_min() -> usize {
    8
}

fn default_max_devices() -> i32 {
    3
}

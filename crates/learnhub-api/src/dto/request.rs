//! Request DTOs.

use serde::Deserialize;

/// Login request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Client device identifier; the `X-Device-Id` header is used when absent.
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Self-registration request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Requested role name, case-insensitive.
    #[serde(default)]
    pub role: Option<String>,
    /// Display name.
    #[serde(default)]
    pub username: Option<String>,
}

/// Refresh request carrying a session token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Session token.
    pub token: String,
}

/// Logout request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Session to end when the access token has no device binding.
    #[serde(default)]
    pub session_token: Option<String>,
}

/// Partial update of the token lifetimes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSettingsUpdate {
    /// New access token lifetime in milliseconds.
    #[serde(default)]
    pub access_token_ttl_ms: Option<u64>,
    /// New session lifetime in milliseconds.
    #[serde(default)]
    pub session_ttl_ms: Option<u64>,
}

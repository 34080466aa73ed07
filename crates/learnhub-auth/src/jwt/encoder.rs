//! Access token creation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use learnhub_core::config::AuthConfig;
use learnhub_core::error::AppError;
use learnhub_entity::account::Account;

use super::claims::Claims;
use crate::lifetimes::TokenLifetimes;

/// Creates signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Shared lifetimes, read at issue time.
    lifetimes: Arc<TokenLifetimes>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("lifetimes", &self.lifetimes)
            .finish()
    }
}

/// A freshly minted access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub token: String,
    /// Claims embedded in the token.
    pub claims: Claims,
}

impl IssuedToken {
    /// When the token stops verifying.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig, lifetimes: Arc<TokenLifetimes>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            lifetimes,
        }
    }

    /// Issues an access token for an account, optionally bound to a device.
    pub fn issue(&self, account: &Account, device_id: Option<&str>) -> Result<IssuedToken, AppError> {
        let iat = Utc::now().timestamp();
        let exp = iat + self.lifetimes.access_ttl().as_secs() as i64;
        let claims = Claims::new(account.id, account.role, device_id.map(String::from), iat, exp)?;
        let token = self.encode(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Signs an arbitrary claim set.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}

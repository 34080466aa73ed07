//! Access token verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use learnhub_core::config::AuthConfig;
use learnhub_core::result::AppResult;

use super::claims::Claims;
use super::error::TokenError;

/// Verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature and expiry, zero leeway.
    validation: Validation,
    /// Signature only.
    signature_only: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let mut signature_only = validation.clone();
        signature_only.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            signature_only,
        }
    }

    /// Checks signature and expiry.
    ///
    /// A token is accepted up to and including its `exp` second and
    /// rejected with [`TokenError::Expired`] strictly after it.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_with(token, &self.validation)
    }

    /// Reads a value out of a token whose signature checks out, without
    /// looking at its expiry.
    pub fn extract_claim<T>(
        &self,
        token: &str,
        select: impl FnOnce(&Claims) -> T,
    ) -> Result<T, TokenError> {
        let claims = self.decode_with(token, &self.signature_only)?;
        Ok(select(&claims))
    }

    /// Seconds until the token expires; zero or negative once it has.
    pub fn remaining_lifetime_seconds(&self, token: &str) -> AppResult<i64> {
        let exp = self.extract_claim(token, |c| c.exp)?;
        Ok(exp - Utc::now().timestamp())
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

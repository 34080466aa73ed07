//! Token verification failures.

use thiserror::Error;

use learnhub_core::error::AppError;

/// Why a presented access token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature is valid but the expiry has passed.
    #[error("Token has expired")]
    Expired,
    /// The token could not be parsed or its signature did not check out.
    #[error("Invalid token: {0}")]
    Malformed(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::authentication(err.to_string())
    }
}

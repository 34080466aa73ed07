//! Cache key builders for every LearnHub cache entry.
//!
//! Backend prefixes (e.g. `learnhub:` on Redis) are applied by the
//! provider, so these are the logical keys only.

use std::fmt::Display;

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a token.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Key marking an access token as revoked.
///
/// The raw token never appears in the key.
pub fn revoked_token(token: &str) -> String {
    format!("revoked:{}", token_digest(token))
}

/// Key of the set of access tokens issued to one device of one account.
///
/// Device ids are chosen by clients and repeat across accounts, so the
/// account is part of the key.
pub fn device_tokens(account_id: impl Display, device_id: &str) -> String {
    format!("device_tokens:{account_id}:{device_id}")
}

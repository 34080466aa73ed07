//! Cache-backed access token revocation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use learnhub_cache::keys;
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;

use crate::jwt::JwtDecoder;

/// Sentinel value stored under a revocation key.
const REVOKED: &str = "1";

/// One device of one account: the scope of a device token index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceKey<'a> {
    pub account_id: Uuid,
    pub device_id: &'a str,
}

impl<'a> DeviceKey<'a> {
    pub fn new(account_id: Uuid, device_id: &'a str) -> Self {
        Self {
            account_id,
            device_id,
        }
    }

    fn index_key(&self) -> String {
        keys::device_tokens(self.account_id, self.device_id)
    }
}

/// Blacklist of access tokens plus a per-device index of issued tokens.
///
/// Cache failures never reach callers. The first failure marks this
/// instance unavailable and from then on `is_revoked` answers `false`
/// and `revoke` only logs, until a cache call succeeds again.
#[derive(Debug)]
pub struct RevocationRegistry {
    cache: Arc<dyn CacheProvider>,
    decoder: Arc<JwtDecoder>,
    device_index_ttl: Duration,
    available: AtomicBool,
}

impl RevocationRegistry {
    /// Creates a registry over the given cache.
    pub fn new(
        cache: Arc<dyn CacheProvider>,
        decoder: Arc<JwtDecoder>,
        device_index_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            decoder,
            device_index_ttl,
            available: AtomicBool::new(true),
        }
    }

    /// Whether the last cache call succeeded.
    pub fn is_cache_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Blacklists a token for its remaining lifetime.
    ///
    /// Tokens with no lifetime left are ignored. With a device, the token
    /// is also added to that device's index.
    pub async fn revoke(&self, token: &str, remaining_secs: i64, device: Option<DeviceKey<'_>>) {
        if remaining_secs <= 0 {
            debug!("Skipping revocation of an already expired token");
            return;
        }

        let ttl = Duration::from_secs(remaining_secs as u64);
        let result = self.cache.set(&keys::revoked_token(token), REVOKED, ttl).await;
        if self.observe("revoke", result).is_none() {
            warn!("Access token revocation was not recorded");
            return;
        }

        if let Some(device) = device {
            self.track(token, device).await;
        }
    }

    /// Adds an issued token to its device's index so it can be revoked
    /// with the device later.
    ///
    /// Members that have already expired are dropped first, so a device
    /// that keeps refreshing holds at most the tokens still alive.
    pub async fn track(&self, token: &str, device: DeviceKey<'_>) {
        let index_key = device.index_key();
        let Some(members) = self.observe("list", self.cache.set_members(&index_key).await) else {
            return;
        };

        let expired: Vec<String> = members
            .into_iter()
            .filter(|member| {
                !matches!(self.decoder.remaining_lifetime_seconds(member), Ok(secs) if secs > 0)
            })
            .collect();
        if !expired.is_empty() {
            let result = self.cache.set_remove(&index_key, &expired).await;
            if self.observe("prune", result).is_some() {
                debug!(pruned = expired.len(), "Pruned expired tokens from device index");
            }
        }

        let result = self
            .cache
            .set_add(&index_key, token, self.device_index_ttl)
            .await;
        self.observe("track", result);
    }

    /// Revokes every still-valid token issued to a device and drops the
    /// device index. Returns how many tokens were newly revoked.
    pub async fn revoke_all_for_device(&self, device: DeviceKey<'_>) -> usize {
        let index_key = device.index_key();
        let Some(members) = self.observe("list", self.cache.set_members(&index_key).await) else {
            return 0;
        };

        let mut revoked = 0;
        for token in members {
            if self.is_revoked(&token).await {
                continue;
            }
            let remaining = match self.decoder.remaining_lifetime_seconds(&token) {
                Ok(secs) if secs > 0 => secs,
                _ => continue,
            };
            let ttl = Duration::from_secs(remaining as u64);
            let result = self.cache.set(&keys::revoked_token(&token), REVOKED, ttl).await;
            if self.observe("revoke", result).is_some() {
                revoked += 1;
            }
        }

        self.observe("clear", self.cache.delete(&index_key).await);
        info!(
            account_id = %device.account_id,
            device_id = device.device_id,
            revoked,
            "Revoked device tokens"
        );
        revoked
    }

    /// Checks the blacklist. Answers `false` when the cache cannot be reached.
    pub async fn is_revoked(&self, token: &str) -> bool {
        let result = self.cache.exists(&keys::revoked_token(token)).await;
        self.observe("lookup", result).unwrap_or(false)
    }

    /// Records the outcome of a cache call and flips availability on change.
    fn observe<T>(&self, operation: &'static str, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                if !self.available.swap(true, Ordering::AcqRel) {
                    info!(operation, "Revocation cache reachable again, enforcing revocations");
                }
                Some(value)
            }
            Err(e) => {
                if self.available.swap(false, Ordering::AcqRel) {
                    warn!(
                        operation,
                        error = %e,
                        "Revocation cache unavailable, revocation checks fail open"
                    );
                } else {
                    debug!(operation, error = %e, "Revocation cache still unavailable");
                }
                None
            }
        }
    }
}

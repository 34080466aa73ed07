//! Cache provider trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for cache backends (Redis or in-memory).
///
/// All values are stored as strings. The cache provider is responsible
/// for key prefixing and per-entry TTL enforcement. Every method may fail
/// with an error of kind `Cache` when the backend is unreachable.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key from the cache.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists in the cache.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Add a member to the set stored at `key` and reset the set's TTL.
    async fn set_add(&self, key: &str, member: &str, ttl: Duration) -> AppResult<()>;

    /// Remove members from the set stored at `key`, keeping its TTL.
    async fn set_remove(&self, key: &str, members: &[String]) -> AppResult<()>;

    /// Return every member of the set stored at `key` (empty if missing).
    async fn set_members(&self, key: &str) -> AppResult<Vec<String>>;

    /// Set the TTL on an existing key.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

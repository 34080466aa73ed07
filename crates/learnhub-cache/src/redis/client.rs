//! Redis connection management.

use std::future::Future;
use std::time::Duration;

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use learnhub_core::config::cache::RedisCacheConfig;
use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;

/// Redis client wrapper with connection management.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis connection manager (multiplexed, reconnecting).
    conn: ConnectionManager,
    /// Key prefix for all keys.
    key_prefix: String,
    /// Upper bound on a single command round-trip.
    response_timeout: Duration,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("key_prefix", &self.key_prefix)
            .field("response_timeout", &self.response_timeout)
            .finish()
    }
}

impl RedisClient {
    /// Create a new Redis client from configuration.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %mask_redis_url(&config.url), "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to create Redis client", e)
        })?;

        let response_timeout = Duration::from_millis(config.response_timeout_ms);
        let conn = tokio::time::timeout(response_timeout * 10, ConnectionManager::new(client))
            .await
            .map_err(|_| AppError::cache("Timed out connecting to Redis"))?
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e))?;

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
            response_timeout,
        })
    }

    /// Get a mutable clone of the connection manager.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Build a full key with the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    /// Run a command future, failing with a cache error if it does not
    /// answer within the response timeout.
    pub async fn run<T, F>(&self, command: F) -> AppResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.response_timeout, command).await {
            Ok(result) => result
                .map_err(|e| AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)),
            Err(_) => Err(AppError::cache("Redis command timed out")),
        }
    }
}

/// Mask password in Redis URL for safe logging.
fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}

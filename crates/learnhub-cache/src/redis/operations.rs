//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    /// Redis client.
    client: RedisClient,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

/// Redis rejects a zero expiry, so sub-second TTLs round up to one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client.run(conn.get(&full_key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client
            .run(conn.set_ex(&full_key, value, ttl_secs(ttl)))
            .await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client.run(conn.del(&full_key)).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client.run(conn.exists(&full_key)).await
    }

    async fn set_add(&self, key: &str, member: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        // SADD key member; EXPIRE key ttl
        let _: () = self
            .client
            .run(
                redis::pipe()
                    .atomic()
                    .sadd(&full_key, member)
                    .ignore()
                    .expire(&full_key, ttl_secs(ttl) as i64)
                    .ignore()
                    .query_async(&mut conn),
            )
            .await?;
        Ok(())
    }

    async fn set_remove(&self, key: &str, members: &[String]) -> AppResult<()> {
        if members.is_empty() {
            return Ok(());
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: i64 = self.client.run(conn.srem(&full_key, members)).await?;
        Ok(())
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client.run(conn.smembers(&full_key)).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        self.client
            .run(conn.expire(&full_key, ttl_secs(ttl) as i64))
            .await
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = self
            .client
            .run(redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(pong == "PONG")
    }
}

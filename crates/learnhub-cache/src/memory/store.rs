//! In-memory cache implementation using the moka crate.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::Op;
use tracing::warn;

use learnhub_core::config::cache::MemoryCacheConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheProvider;

/// Value stored under a key, mirroring the two Redis types in use.
#[derive(Debug, Clone)]
enum Value {
    Text(String),
    Set(HashSet<String>),
}

/// A cached value together with its own time-to-live.
#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    ttl: Duration,
    /// Keep the current expiry on update instead of restarting `ttl`.
    keep_expiry: bool,
}

impl Slot {
    fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            ttl,
            keep_expiry: false,
        }
    }
}

/// Expires each slot after its own TTL, restarting it on every write
/// except set removals.
struct SlotExpiry;

impl Expiry<String, Slot> for SlotExpiry {
    fn expire_after_create(&self, _key: &String, slot: &Slot, _created_at: Instant) -> Option<Duration> {
        Some(slot.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        slot: &Slot,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        if slot.keep_expiry {
            return duration_until_expiry;
        }
        Some(slot.ttl)
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Slot>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let mut builder = Cache::builder().expire_after(SlotExpiry);
        if let Some(capacity) = config.max_capacity {
            warn!(
                capacity,
                "Memory cache is capped; revocations may be evicted before they expire"
            );
            builder = builder.max_capacity(capacity);
        }
        Self {
            cache: builder.build(),
        }
    }

    fn wrong_type(key: &str) -> AppError {
        AppError::cache(format!("Key '{key}' holds a value of the wrong type"))
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match self.cache.get(key).await.map(|s| s.value) {
            None => Ok(None),
            Some(Value::Text(text)) => Ok(Some(text)),
            Some(Value::Set(_)) => Err(Self::wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let slot = Slot::new(Value::Text(value.to_string()), ttl);
        self.cache.insert(key.to_string(), slot).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }

    async fn set_add(&self, key: &str, member: &str, ttl: Duration) -> AppResult<()> {
        let member = member.to_string();
        let mut clash = false;
        self.cache
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let mut members = HashSet::new();
                match existing.map(|e| e.into_value()) {
                    Some(Slot {
                        value: Value::Set(current),
                        ..
                    }) => members = current,
                    Some(other) => {
                        clash = true;
                        return std::future::ready(other);
                    }
                    None => {}
                }
                members.insert(member);
                std::future::ready(Slot::new(Value::Set(members), ttl))
            })
            .await;

        if clash {
            return Err(Self::wrong_type(key));
        }
        Ok(())
    }

    async fn set_remove(&self, key: &str, members: &[String]) -> AppResult<()> {
        let mut clash = false;
        self.cache
            .entry(key.to_string())
            .and_compute_with(|existing| {
                let op = match existing.map(|e| e.into_value()) {
                    None => Op::Nop,
                    Some(Slot {
                        value: Value::Set(mut current),
                        ttl,
                        ..
                    }) => {
                        current.retain(|m| !members.contains(m));
                        if current.is_empty() {
                            Op::Remove
                        } else {
                            Op::Put(Slot {
                                value: Value::Set(current),
                                ttl,
                                keep_expiry: true,
                            })
                        }
                    }
                    Some(_) => {
                        clash = true;
                        Op::Nop
                    }
                };
                std::future::ready(op)
            })
            .await;

        if clash {
            return Err(Self::wrong_type(key));
        }
        Ok(())
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        match self.cache.get(key).await.map(|s| s.value) {
            None => Ok(Vec::new()),
            Some(Value::Set(members)) => Ok(members.into_iter().collect()),
            Some(Value::Text(_)) => Err(Self::wrong_type(key)),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        match self.cache.get(key).await {
            Some(mut slot) => {
                slot.ttl = ttl;
                slot.keep_expiry = false;
                self.cache.insert(key.to_string(), slot).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

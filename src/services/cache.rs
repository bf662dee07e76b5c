use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Key-value storage behind the cache manager
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every key that starts with `prefix`
    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}

/// In-process backend with a fixed capacity and time-to-live
pub struct MemoryBackend {
    entries: moka::future::Cache<String, String>,
}

impl MemoryBackend {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let entries = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self { entries }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        let prefix = prefix.to_string();
        // Only fails when invalidation closures are not enabled on the builder
        if let Err(e) = self
            .entries
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            tracing::warn!("Falling back to full L1 invalidation: {}", e);
            self.entries.invalidate_all();
        }
        Ok(())
    }
}

/// Redis backend shared across service instances
pub struct RedisBackend {
    // Store ConnectionManager in a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    ttl_secs: u64,
}

impl RedisBackend {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            ttl_secs,
        })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut *conn).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(value)
            .query_async(&mut *conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("DEL").arg(key).query_async(&mut *conn).await?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        let mut conn = self.redis.lock().await;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{}*", prefix))
            .query_async(&mut *conn)
            .await?;

        if !keys.is_empty() {
            let _: () = redis::cmd("DEL").arg(keys).query_async(&mut *conn).await?;
        }
        Ok(())
    }
}

/// Multi-tier cache manager
///
/// Implements L1 (in-memory) and optional L2 (Redis) caching. L1 is fastest
/// but local to the process; L2 is shared across instances. Values are
/// stored as JSON.
pub struct CacheManager {
    l1: MemoryBackend,
    l2: Option<Box<dyn CacheBackend>>,
}

impl CacheManager {
    /// Create a cache manager with a Redis L2 tier
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let l2 = RedisBackend::connect(redis_url, ttl_secs).await?;

        Ok(Self {
            l1: MemoryBackend::new(l1_size, Duration::from_secs(ttl_secs)),
            l2: Some(Box::new(l2)),
        })
    }

    /// Create a cache manager that only uses the in-process tier
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            l1: MemoryBackend::new(l1_size, Duration::from_secs(ttl_secs)),
            l2: None,
        }
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        if let Some(json) = self.l1.get(key).await? {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_str(&json)?);
        }

        if let Some(l2) = &self.l2 {
            if let Some(json) = l2.get(key).await? {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                self.l1.set(key, json.clone()).await?;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (all tiers)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1.set(key, json.clone()).await?;
        if let Some(l2) = &self.l2 {
            l2.set(key, json).await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from all tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1.delete(key).await?;
        if let Some(l2) = &self.l2 {
            l2.delete(key).await?;
        }
        Ok(())
    }

    /// Invalidate every entry whose key starts with `prefix`
    pub async fn invalidate_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        self.l1.delete_prefix(prefix).await?;
        if let Some(l2) = &self.l2 {
            l2.delete_prefix(prefix).await?;
        }

        tracing::debug!("Invalidated cache prefix: {}", prefix);
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a mentee's ranked match list
    pub fn matches(mentee_id: &str) -> String {
        format!("matches:{}", mentee_id)
    }

    /// Build a cache key for a single mentee/mentor pair
    pub fn pair(mentee_id: &str, mentor_id: &str) -> String {
        format!("match:{}:{}", mentee_id, mentor_id)
    }

    /// Prefix shared by every pair key of a mentee
    pub fn pair_prefix(mentee_id: &str) -> String {
        format!("match:{}:", mentee_id)
    }
}

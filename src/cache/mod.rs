//! Cache Module
//!
//! Key-value caching of computed BMI values with TTL expiration.
//!
//! Two backends implement [`CacheBackend`]: [`RedisCache`] talks to an
//! external Redis server and [`MemoryCache`] keeps entries in-process.

mod entry;
mod memory;
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

// == Public Constants ==
/// Prefix shared by every BMI cache key
pub const KEY_PREFIX: &str = "bmi";

// == Cache Backend ==
/// Contract between the request handler and a key-value store.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Drops expired entries held in this process. Returns how many were removed.
    async fn purge_expired(&self) -> usize {
        0
    }
}

// == Key Builder ==
/// Builds the cache key for a (height, weight) pair.
///
/// `f64`'s `Display` prints the shortest string that round-trips, so distinct
/// finite inputs never share a key. Magnitudes outside roughly 1e-4..1e21
/// print in plain digits, so those keys differ from a `%v`-style formatter's
/// exponent notation.
pub fn bmi_key(height: f64, weight: f64) -> String {
    format!("{}:{}:{}", KEY_PREFIX, height, weight)
}

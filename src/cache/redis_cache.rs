//! Redis Cache Module
//!
//! Cache backend backed by an external Redis server through a
//! multiplexed, auto-reconnecting `ConnectionManager`.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::cache::CacheBackend;
use crate::config::RedisConfig;
use crate::error::{CacheError, CacheResult};

// == Redis Cache ==
/// Redis-backed cache. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    // == Connect ==
    /// Connects to Redis and verifies the connection with `PING`.
    ///
    /// Any failure here is a startup error; the server does not run without
    /// a reachable cache when this backend is selected.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        let client = redis::Client::open(config.connection_info())
            .map_err(|err| CacheError::Connection(err.to_string()))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|err| CacheError::Connection(err.to_string()))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|err| CacheError::Connection(err.to_string()))?;
        if pong != "PONG" {
            return Err(CacheError::Unavailable(format!(
                "unexpected PING reply: {}",
                pong
            )));
        }

        info!("Connected to Redis at {}:{}", config.host, config.port);
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        // Redis rejects an EX of zero
        let seconds = ttl.as_secs().max(1);
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

//! Redis store provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use votelive_core::error::{AppError, ErrorKind};
use votelive_core::result::AppResult;
use votelive_core::traits::kv::KvStore;

use super::client::RedisClient;

/// Redis-backed key/value store.
#[derive(Debug, Clone)]
pub struct RedisKvStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisKvStore {
    /// Create a new Redis store provider.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(key, value, ttl.as_secs())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let result: bool = conn
            .expire(key, ttl.as_secs() as i64)
            .await
            .map_err(Self::map_err)?;
        Ok(result)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn keys_matching(&self, pattern: &str) -> AppResult<Vec<String>> {
        let mut conn = self.client.conn_mut();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(keys)
    }

    async fn set_add(&self, key: &str, member: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn.sadd(key, member).await.map_err(Self::map_err)?;
        let _: bool = conn
            .expire(key, ttl.as_secs() as i64)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_card(&self, key: &str) -> AppResult<u64> {
        let mut conn = self.client.conn_mut();
        let count: u64 = conn.scard(key).await.map_err(Self::map_err)?;
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}

//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use votelive_core::config::cache::CacheConfig;
use votelive_core::error::AppError;
use votelive_core::result::AppResult;
use votelive_core::traits::kv::KvStore;

/// Wraps the key/value store provider selected at construction time.
#[derive(Debug, Clone)]
pub struct KvManager {
    /// The inner store provider.
    inner: Arc<dyn KvStore>,
}

impl KvManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn KvStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis key/value store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisKvStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory key/value store");
                Arc::new(crate::memory::MemoryKvStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Shared handle to the inner provider.
    pub fn store(&self) -> Arc<dyn KvStore> {
        Arc::clone(&self.inner)
    }
}

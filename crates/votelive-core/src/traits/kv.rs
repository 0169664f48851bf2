//! Key/value store adapter contract.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Contract over a shared, TTL-capable key/value store.
///
/// All session and presence state lives behind this trait; no in-process
/// state is authoritative, which is what allows several realtime nodes to
/// serve the same election. Every operation may fail with a transport
/// error; callers with a source of truth to fall back on should degrade
/// rather than propagate.
///
/// Keys are structured and colon-delimited (see `votelive_cache::keys`);
/// implementations must store them verbatim so that pattern scans and
/// positional field extraction keep working.
#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Reset the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// List all keys matching a glob pattern (e.g. `"WS_ELEC:e1:VOTER:*"`).
    async fn keys_matching(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Add a member to the set at `key`, creating it if needed, and reset
    /// the set's TTL. Idempotent per member.
    async fn set_add(&self, key: &str, member: &str, ttl: Duration) -> AppResult<()>;

    /// Cardinality of the set at `key` (0 if absent or expired).
    async fn set_card(&self, key: &str) -> AppResult<u64>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

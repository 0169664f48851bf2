//! Read-through helper over the shared key/value store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use votelive_core::result::AppResult;
use votelive_core::traits::KvStore;

/// Reads `key` from the store, falling back to `fetch` on a miss.
///
/// A store failure degrades to the source rather than failing the call;
/// the fetched value is written back best-effort so a broken store never
/// breaks a read.
pub async fn read_through<F, Fut>(
    kv: &Arc<dyn KvStore>,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> AppResult<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<String>>,
{
    match kv.get(key).await {
        Ok(Some(value)) => return Ok(value),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(key, error = %e, "cache read failed, fetching from source");
        }
    }

    let value = fetch().await?;

    if let Err(e) = kv.set(key, &value, ttl).await {
        tracing::warn!(key, error = %e, "cache write failed");
    }

    Ok(value)
}

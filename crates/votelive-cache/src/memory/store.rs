//! DashMap-backed store with per-entry deadlines.
//!
//! Expiry is lazy: entries past their deadline are treated as absent and
//! removed on the next access. Pattern matching supports `*` wildcards the
//! same way Redis `KEYS` does for the key shapes this crate builds.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use votelive_core::result::AppResult;
use votelive_core::traits::kv::KvStore;

#[derive(Debug, Clone)]
struct ValueEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
struct SetEntry {
    members: HashSet<String>,
    expires_at: Instant,
}

/// In-memory key/value store.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: DashMap<String, ValueEntry>,
    sets: DashMap<String, SetEntry>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_expired(&self, key: &str, now: Instant) {
        if let Some(entry) = self.values.get(key) {
            if entry.expires_at <= now {
                drop(entry);
                self.values.remove(key);
            }
        }
        if let Some(entry) = self.sets.get(key) {
            if entry.expires_at <= now {
                drop(entry);
                self.sets.remove(key);
            }
        }
    }
}

/// Glob match with `*` matching any run of characters, including none.
fn glob_match(pattern: &str, key: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == key,
        Some((prefix, rest)) => {
            if !key.starts_with(prefix) {
                return false;
            }
            let tail = &key[prefix.len()..];
            if rest.is_empty() {
                return true;
            }
            tail.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(tail.len()))
                .any(|i| glob_match(rest, &tail[i..]))
        }
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        self.purge_expired(key, now);
        Ok(self.values.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.values.insert(
            key.to_string(),
            ValueEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        self.purge_expired(key, now);
        let deadline = now + ttl;
        let mut touched = false;
        if let Some(mut entry) = self.values.get_mut(key) {
            entry.expires_at = deadline;
            touched = true;
        }
        if let Some(mut entry) = self.sets.get_mut(key) {
            entry.expires_at = deadline;
            touched = true;
        }
        Ok(touched)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.values.remove(key);
        self.sets.remove(key);
        Ok(())
    }

    async fn keys_matching(&self, pattern: &str) -> AppResult<Vec<String>> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .values
            .iter()
            .filter(|entry| entry.expires_at > now && glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        keys.extend(
            self.sets
                .iter()
                .filter(|entry| entry.expires_at > now && glob_match(pattern, entry.key()))
                .map(|entry| entry.key().clone()),
        );
        Ok(keys)
    }

    async fn set_add(&self, key: &str, member: &str, ttl: Duration) -> AppResult<()> {
        let now = Instant::now();
        self.purge_expired(key, now);
        let mut entry = self.sets.entry(key.to_string()).or_insert_with(|| SetEntry {
            members: HashSet::new(),
            expires_at: now + ttl,
        });
        entry.members.insert(member.to_string());
        entry.expires_at = now + ttl;
        Ok(())
    }

    async fn set_card(&self, key: &str) -> AppResult<u64> {
        let now = Instant::now();
        self.purge_expired(key, now);
        Ok(self
            .sets
            .get(key)
            .map(|entry| entry.members.len() as u64)
            .unwrap_or(0))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

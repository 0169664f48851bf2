//! HTTP client for election and vote projections.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use votelive_cache::keys;
use votelive_core::config::{BackendConfig, CacheConfig};
use votelive_core::error::AppError;
use votelive_core::result::AppResult;
use votelive_core::traits::{ElectionDirectory, KvStore};
use votelive_core::types::{ElectionWithVotes, VoteState, VoteStatus};

use crate::cache_util::read_through;

/// Ballots-cast sets outlive any single vote session.
const VOTED_VOTERS_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

/// Reads election projections from the CRUD backend, through the shared
/// key/value store where the vote-processing service keeps hot fields.
#[derive(Debug, Clone)]
pub struct ElectionClient {
    /// HTTP client.
    http: reqwest::Client,
    /// Backend base URL, no trailing slash.
    base_url: String,
    /// Shared key/value store.
    kv: Arc<dyn KvStore>,
    /// TTL for cached projections.
    projection_ttl: Duration,
}

impl ElectionClient {
    /// Creates a new client against the configured backend.
    pub fn new(
        backend: &BackendConfig,
        cache: &CacheConfig,
        kv: Arc<dyn KvStore>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(backend.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    votelive_core::error::ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: backend.base_url.trim_end_matches('/').to_string(),
            kv,
            projection_ttl: Duration::from_secs(cache.projection_ttl_seconds),
        })
    }

    /// Election title, read through `ELEC:<id>:TITLE`.
    pub async fn election_title(&self, elec_id: &str) -> AppResult<String> {
        let key = keys::election_title(elec_id);
        read_through(&self.kv, &key, self.projection_ttl, || async {
            Ok(self.fetch_election(elec_id).await?.title)
        })
        .await
    }

    /// Records that `voter_id` has cast a ballot in `vote_id`.
    pub async fn mark_voted(&self, vote_id: &str, voter_id: &str) -> AppResult<()> {
        self.kv
            .set_add(&keys::voted_voter_list(vote_id), voter_id, VOTED_VOTERS_TTL)
            .await
    }

    async fn fetch_election(&self, elec_id: &str) -> AppResult<ElectionWithVotes> {
        let url = format!("{}/api/elections/{}", self.base_url, elec_id);
        let response = self.http.get(&url).send().await.map_err(external)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!(
                "Election not found: {elec_id}"
            )));
        }
        let response = response.error_for_status().map_err(external)?;
        response.json().await.map_err(external)
    }

    async fn fetch_vote_status(&self, vote_id: &str) -> AppResult<VoteStatus> {
        let url = format!("{}/api/votes/{}/status", self.base_url, vote_id);
        let response = self.http.get(&url).send().await.map_err(external)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!("Vote not found: {vote_id}")));
        }
        let response = response.error_for_status().map_err(external)?;
        response.json().await.map_err(external)
    }
}

#[async_trait]
impl ElectionDirectory for ElectionClient {
    async fn election_info(&self, elec_id: &str) -> AppResult<ElectionWithVotes> {
        self.fetch_election(elec_id).await
    }

    /// The vote-processing service writes state transitions and voted-voter
    /// sets straight into the store, so those fields override what the CRUD
    /// backend last persisted.
    async fn vote_status(&self, vote_id: &str) -> AppResult<VoteStatus> {
        let mut status = self.fetch_vote_status(vote_id).await?;

        match self.kv.get(&keys::vote_state(vote_id)).await {
            Ok(Some(raw)) => match raw.parse::<u8>().map_err(|_| ()).and_then(|code| {
                VoteState::try_from(code).map_err(|_| ())
            }) {
                Ok(state) => status.state = state,
                Err(()) => {
                    tracing::warn!(vote_id, raw, "unparseable cached vote state, ignoring");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(vote_id, error = %e, "vote state cache read failed");
            }
        }

        match self.kv.set_card(&keys::voted_voter_list(vote_id)).await {
            Ok(count) if count > status.voted_count => status.voted_count = count,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(vote_id, error = %e, "voted voter set read failed");
            }
        }

        Ok(status)
    }
}

fn external(e: reqwest::Error) -> AppError {
    AppError::with_source(
        votelive_core::error::ErrorKind::ExternalService,
        format!("Backend request failed: {e}"),
        e,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use votelive_cache::memory::MemoryKvStore;

    // Backend that refuses connections, so any accidental fetch errors out.
    fn client(kv: Arc<dyn KvStore>) -> ElectionClient {
        let backend = BackendConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_seconds: 1,
        };
        ElectionClient::new(&backend, &CacheConfig::default(), kv).unwrap()
    }

    #[tokio::test]
    async fn cached_title_is_served_without_a_backend_call() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        kv.set("ELEC:e1:TITLE", "Board election", Duration::from_secs(60))
            .await
            .unwrap();

        let title = client(kv).election_title("e1").await.unwrap();
        assert_eq!(title, "Board election");
    }

    #[tokio::test]
    async fn mark_voted_dedupes_by_voter_id() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let client = client(kv.clone());

        client.mark_voted("vt1", "v1").await.unwrap();
        client.mark_voted("vt1", "v1").await.unwrap();
        client.mark_voted("vt1", "v2").await.unwrap();

        assert_eq!(kv.set_card("VOTE:vt1:VOTED_VOTERS").await.unwrap(), 2);
    }
}

//! Redis pub/sub bridge feeding the fanout engine.
//!
//! The CRUD backend and vote-processing service publish domain change
//! notifications on one channel; every gateway instance subscribes and fans
//! out to its own connections. A malformed message is logged and skipped.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{info, warn};

use votelive_core::error::{AppError, ErrorKind};
use votelive_core::events::DomainEvent;
use votelive_core::result::AppResult;

use super::engine::FanoutEngine;

/// Subscribes to the domain-event channel and dispatches to the fanout
/// engine until the subscription ends.
pub struct RedisEventBridge {
    client: redis::Client,
    channel: String,
}

impl std::fmt::Debug for RedisEventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventBridge")
            .field("channel", &self.channel)
            .finish()
    }
}

impl RedisEventBridge {
    pub fn new(redis_url: &str, channel: &str) -> AppResult<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis URL", e)
        })?;
        Ok(Self {
            client,
            channel: channel.to_string(),
        })
    }

    /// Runs the subscription loop. Returns when the connection drops.
    pub async fn run(&self, fanout: Arc<FanoutEngine>) -> AppResult<()> {
        let mut pubsub = self.client.get_async_pubsub().await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Redis pub/sub connect failed", e)
        })?;
        pubsub.subscribe(&self.channel).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Redis subscribe failed", e)
        })?;
        info!(channel = %self.channel, "listening for domain events");

        let mut stream = pubsub.on_message();
        while let Some(message) = stream.next().await {
            let payload: String = match message.get_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "unreadable pub/sub payload");
                    continue;
                }
            };
            match serde_json::from_str::<DomainEvent>(&payload) {
                Ok(DomainEvent::ElectionUpdated { elec_id }) => {
                    if let Err(e) = fanout.election_updated(&elec_id).await {
                        warn!(elec_id, error = %e, "election fanout failed");
                    }
                }
                Ok(DomainEvent::VoteUpdated { vote_id }) => {
                    if let Err(e) = fanout.vote_updated(&vote_id).await {
                        warn!(vote_id, error = %e, "vote update hook failed");
                    }
                }
                Err(e) => {
                    warn!(error = %e, payload, "unparseable domain event");
                }
            }
        }

        Ok(())
    }
}

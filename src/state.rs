//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use votelive_core::traits::KvStore;
use votelive_realtime::RealtimeHub;
use votelive_realtime::gateway::LocalGateway;

/// State shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    /// Realtime engine.
    pub hub: Arc<RealtimeHub>,
    /// Socket table, present only in self-hosted transport mode.
    pub local_gateway: Option<Arc<LocalGateway>>,
    /// Shared key/value store, for health checks.
    pub kv: Arc<dyn KvStore>,
    /// Interval between protocol-level pings on held sockets.
    pub heartbeat_interval: Duration,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("local_transport", &self.local_gateway.is_some())
            .finish()
    }
}

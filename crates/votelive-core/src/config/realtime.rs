//! Real-time session and transport configuration.

use serde::{Deserialize, Serialize};

/// Real-time engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Transport backend: `"local"` (in-process sockets) or `"managed"`
    /// (external push API + lifecycle webhooks). Selected once at startup.
    #[serde(default = "default_transport")]
    pub transport: String,
    /// Session and presence lease in seconds. Clients must heartbeat at a
    /// strictly shorter interval or be reaped by store expiry.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Recommended client heartbeat interval in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Buffer size of each connection's outbound message channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Redis pub/sub channel carrying domain change notifications.
    #[serde(default = "default_events_channel")]
    pub events_channel: String,
    /// Managed-transport settings.
    #[serde(default)]
    pub managed: ManagedGatewayConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            session_ttl_seconds: default_session_ttl(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            channel_buffer_size: default_channel_buffer(),
            events_channel: default_events_channel(),
            managed: ManagedGatewayConfig::default(),
        }
    }
}

/// Managed push backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagedGatewayConfig {
    /// Base URL of the connection push API
    /// (`POST {push_endpoint}/connections/{id}` delivers a frame).
    #[serde(default)]
    pub push_endpoint: String,
}

fn default_transport() -> String {
    "local".to_string()
}

fn default_session_ttl() -> u64 {
    60
}

fn default_heartbeat_interval() -> u64 {
    15
}

fn default_channel_buffer() -> usize {
    64
}

fn default_events_channel() -> String {
    "votelive:events".to_string()
}

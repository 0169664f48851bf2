//! Delivery backends behind one send/close contract.
//!
//! The backend is picked once at startup from configuration; nothing else
//! in the engine branches on deployment mode.

pub mod local;
pub mod managed;

use async_trait::async_trait;

use votelive_core::result::AppResult;

use crate::protocol::OutboundEvent;

pub use local::{Frame, LocalGateway};
pub use managed::ManagedGateway;

/// Uniform outbound delivery per connection id.
#[async_trait]
pub trait TransportGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Delivers a raw text frame.
    ///
    /// Fails with a connection error when the backend reports the
    /// connection gone; callers must not retry such a send.
    async fn send(&self, connection_id: &str, text: &str) -> AppResult<()>;

    /// Serializes an event envelope and delivers it.
    async fn send_event(&self, connection_id: &str, event: &OutboundEvent) -> AppResult<()> {
        let text = serde_json::to_string(event)?;
        self.send(connection_id, &text).await
    }

    /// Closes a connection. Best-effort and idempotent.
    async fn close(&self, connection_id: &str) -> AppResult<()>;
}

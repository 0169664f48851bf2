//! Application-level wire protocol and the handshake state machine.

pub mod cookies;
pub mod engine;
pub mod events;

pub use engine::{ConnectRejection, ProtocolEngine};
pub use events::{HandshakeMode, InboundEvent, OutboundEvent};

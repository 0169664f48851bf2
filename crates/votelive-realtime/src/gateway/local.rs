//! Self-hosted delivery over in-process socket channels.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use votelive_core::error::AppError;
use votelive_core::result::AppResult;

use super::TransportGateway;

/// What the socket-owning task should write next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A UTF-8 text frame.
    Text(String),
    /// Close the socket.
    Close,
}

/// Gateway for directly held sockets.
///
/// Each accepted socket registers an outbound channel here; the task that
/// owns the socket drains the receiver and writes frames. Dropping out of
/// the table is how a connection becomes unreachable.
#[derive(Debug, Default)]
pub struct LocalGateway {
    connections: DashMap<String, mpsc::Sender<Frame>>,
    buffer_size: usize,
}

impl LocalGateway {
    /// Creates an empty gateway with the given per-connection buffer.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            connections: DashMap::new(),
            buffer_size,
        }
    }

    /// Registers a connection and hands back its outbound frame stream.
    pub fn register(&self, connection_id: &str) -> mpsc::Receiver<Frame> {
        let (tx, rx) = mpsc::channel(self.buffer_size.max(1));
        self.connections.insert(connection_id.to_string(), tx);
        rx
    }

    /// Forgets a connection. Idempotent.
    pub fn deregister(&self, connection_id: &str) {
        self.connections.remove(connection_id);
    }

    /// Number of locally registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn sender(&self, connection_id: &str) -> Option<mpsc::Sender<Frame>> {
        self.connections
            .get(connection_id)
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl TransportGateway for LocalGateway {
    async fn send(&self, connection_id: &str, text: &str) -> AppResult<()> {
        let tx = self.sender(connection_id).ok_or_else(|| {
            AppError::connection(format!("No local socket for connection {connection_id}"))
        })?;
        tx.send(Frame::Text(text.to_string())).await.map_err(|_| {
            // Receiver dropped: the socket task already exited.
            self.connections.remove(connection_id);
            AppError::connection(format!("Socket task gone for connection {connection_id}"))
        })
    }

    async fn close(&self, connection_id: &str) -> AppResult<()> {
        if let Some((_, tx)) = self.connections.remove(connection_id) {
            let _ = tx.send(Frame::Close).await;
        }
        Ok(())
    }
}

//! Viewer connection port.
//!
//! A viewer is anything that watches a session in real time, typically a
//! WebSocket client. The broadcast hub only needs to push text at it and
//! tell one viewer from another.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// A viewer could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delivery to viewer {viewer_id} failed: {reason}")]
pub struct DeliveryError {
    /// The unreachable viewer.
    pub viewer_id: Uuid,
    /// Transport-level detail.
    pub reason: String,
}

/// One live viewer of a session.
#[async_trait]
pub trait ViewerConnection: Send + Sync {
    /// Stable identity of this connection.
    fn id(&self) -> Uuid;

    /// Pushes one text frame to the viewer.
    ///
    /// # Errors
    ///
    /// `DeliveryError` if the underlying transport is closed or broken.
    async fn send_text(&self, message: &str) -> Result<(), DeliveryError>;
}

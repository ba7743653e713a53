//! A viewer backed by an unbounded mpsc channel.
//!
//! The WebSocket route owns the receiving half and forwards whatever arrives
//! to the socket, so the hub never touches the socket directly.

use async_trait::async_trait;
use frightfate_core::viewer::{DeliveryError, ViewerConnection};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use uuid::Uuid;

/// Sending half of a viewer channel.
#[derive(Debug, Clone)]
pub struct ChannelConnection {
    id: Uuid,
    sender: UnboundedSender<String>,
}

impl ChannelConnection {
    /// Creates a connection and the receiver its frames arrive on.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = unbounded_channel();
        (
            Self {
                id: Uuid::new_v4(),
                sender,
            },
            receiver,
        )
    }
}

#[async_trait]
impl ViewerConnection for ChannelConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn send_text(&self, message: &str) -> Result<(), DeliveryError> {
        self.sender
            .send(message.to_owned())
            .map_err(|_| DeliveryError {
                viewer_id: self.id,
                reason: "receiver dropped".to_owned(),
            })
    }
}

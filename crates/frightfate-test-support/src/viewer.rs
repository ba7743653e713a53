//! Test viewers — in-memory `ViewerConnection` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use frightfate_core::viewer::{DeliveryError, ViewerConnection};
use uuid::Uuid;

/// A viewer that records every frame it is sent.
#[derive(Debug)]
pub struct RecordingConnection {
    id: Uuid,
    received: Mutex<Vec<String>>,
}

impl RecordingConnection {
    /// Creates a viewer with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Frames received so far, in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Default for RecordingConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ViewerConnection for RecordingConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn send_text(&self, message: &str) -> Result<(), DeliveryError> {
        self.received.lock().unwrap().push(message.to_owned());
        Ok(())
    }
}

/// A half-closed viewer: every send fails.
#[derive(Debug)]
pub struct BrokenConnection {
    id: Uuid,
}

impl BrokenConnection {
    /// Creates a broken viewer with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl Default for BrokenConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ViewerConnection for BrokenConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn send_text(&self, _message: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError {
            viewer_id: self.id,
            reason: "socket closed".to_owned(),
        })
    }
}

//! Shared application state.

use std::sync::{Arc, Mutex};

use frightfate_broadcast::BroadcastHub;
use frightfate_core::clock::Clock;
use frightfate_core::rng::DeterministicRng;
use frightfate_core::store::SessionStore;
use frightfate_narrative::application::NarrativeEngine;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock>,
    /// RNG for session codes.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Session, player and answer storage.
    pub store: Arc<dyn SessionStore>,
    /// Oracle-backed scenario, scoring and results components.
    pub engine: NarrativeEngine,
    /// Live viewer connections per session.
    pub hub: Arc<BroadcastHub>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state with an empty broadcast hub.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        store: Arc<dyn SessionStore>,
        engine: NarrativeEngine,
    ) -> Self {
        Self {
            clock,
            rng,
            store,
            engine,
            hub: Arc::new(BroadcastHub::new()),
        }
    }
}

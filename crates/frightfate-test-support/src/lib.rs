//! Shared test mocks and utilities for the FrightFate game engine.

mod clock;
mod oracle;
mod rng;
mod store;
mod viewer;

pub use clock::FixedClock;
pub use oracle::{FailingOracle, ScriptedOracle, StallingOracle};
pub use rng::{MockRng, SequenceRng};
pub use store::FailingSessionStore;
pub use viewer::{BrokenConnection, RecordingConnection};

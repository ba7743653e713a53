//! FrightFate — narrative and elimination orchestration.
//!
//! Generates scenarios and scores answers through an unreliable narrative
//! oracle, falling back to deterministic content whenever the oracle is slow,
//! absent, or returns something unusable. Also owns the elimination state
//! machine and end-of-game results.

pub mod application;
pub mod domain;

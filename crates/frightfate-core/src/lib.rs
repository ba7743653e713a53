//! FrightFate Core — shared domain vocabulary.
//!
//! This crate defines the records, error taxonomy, and ports (session store,
//! narrative oracle, viewer connection, clock, RNG) that every other crate
//! depends on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod model;
pub mod oracle;
pub mod rng;
pub mod scenario;
pub mod store;
pub mod theme;
pub mod viewer;

//! FrightFate — session lobby lifecycle.
//!
//! Creating sessions, joining them, readying up and starting play. The
//! narrative engine takes over once a session is in progress.

pub mod application;
pub mod domain;

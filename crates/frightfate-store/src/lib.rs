//! Session store adapters for the FrightFate game engine.

pub mod in_memory;

pub use in_memory::InMemorySessionStore;

//! FrightFate — per-session real-time broadcast fan-out.
//!
//! The hub relays opaque text payloads to every viewer of a session. It does
//! not parse them.

pub mod channel;
pub mod hub;

pub use channel::ChannelConnection;
pub use hub::BroadcastHub;

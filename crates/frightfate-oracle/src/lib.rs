//! FrightFate — narrative oracle adapters.
//!
//! [`GeminiOracle`] talks to Google's Gemini `generateContent` endpoint.
//! [`DisabledOracle`] stands in when no API key is configured, sending every
//! call straight to the engine's fallback path.

pub mod disabled;
pub mod gemini;

pub use disabled::DisabledOracle;
pub use gemini::GeminiOracle;

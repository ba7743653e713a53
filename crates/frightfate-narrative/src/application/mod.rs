//! Application layer: the oracle-backed components and the command and
//! query handlers that orchestrate them against the session store.

pub mod answer_evaluator;
pub mod bounded;
pub mod command_handlers;
pub mod config;
pub mod engine;
pub mod oracle_json;
pub mod prompts;
pub mod query_handlers;
pub mod results_aggregator;
pub mod scenario_generator;

pub use config::NarrativeConfig;
pub use engine::NarrativeEngine;

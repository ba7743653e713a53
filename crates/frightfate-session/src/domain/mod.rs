//! Domain layer for the session context.

pub mod commands;
pub mod session_code;

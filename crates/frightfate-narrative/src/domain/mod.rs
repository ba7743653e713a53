//! Pure game rules: no I/O, no oracle calls.

pub mod choice_pattern;
pub mod commands;
pub mod elimination;
pub mod evaluation;
pub mod fallback;
pub mod results;

//! Caller-visible domain error types.
//!
//! Oracle failures are deliberately absent here: they are recovered inside
//! the narrative engine and never reach a caller (see
//! [`crate::oracle::OracleError`]).

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An unknown session or player was referenced.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up (`"session"`, `"player"`).
        entity: &'static str,
        /// The identifier that did not resolve.
        id: String,
    },

    /// The request conflicts with current state (duplicate player name,
    /// session not accepting joins, duplicate session code).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The player has been eliminated and may take no further turns.
    #[error("player {player_id} has been eliminated and cannot continue")]
    AlreadyEliminated {
        /// The eliminated player.
        player_id: Uuid,
    },

    /// The request itself is malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A store or other infrastructure failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for an unknown session code.
    #[must_use]
    pub fn session_not_found(session_code: &str) -> Self {
        Self::NotFound {
            entity: "session",
            id: session_code.to_owned(),
        }
    }

    /// Shorthand for an unknown player.
    #[must_use]
    pub fn player_not_found(player_id: Uuid) -> Self {
        Self::NotFound {
            entity: "player",
            id: player_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let err = DomainError::session_not_found("ABC123");
        assert_eq!(err.to_string(), "session not found: ABC123");
    }
}

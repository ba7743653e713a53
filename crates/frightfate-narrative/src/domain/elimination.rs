//! Player elimination state machine.
//!
//! `Active` → `Eliminated` on an evaluation that calls an instant death.
//! `Eliminated` is terminal. Status is always derived from the player's most
//! recent answer rather than tracked separately, so it cannot drift from the
//! answer log.

use frightfate_core::error::DomainError;
use frightfate_core::model::PlayerAnswer;
use serde::Serialize;
use uuid::Uuid;

use super::evaluation::{DEFAULT_DEATH_REASON, EvaluationResult};

/// A player's survival status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Still playing.
    Active,
    /// Dead. Terminal.
    Eliminated {
        /// Why the player died.
        reason: String,
    },
}

impl PlayerStatus {
    /// Status implied by the player's most recent answer.
    #[must_use]
    pub fn from_latest_answer(latest: Option<&PlayerAnswer>) -> Self {
        match latest.and_then(|a| a.elimination_reason.as_ref()) {
            Some(reason) => Self::Eliminated {
                reason: reason.clone(),
            },
            None => Self::Active,
        }
    }

    /// Whether the player has been eliminated.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        matches!(self, Self::Eliminated { .. })
    }

    /// The elimination reason, if eliminated.
    #[must_use]
    pub fn elimination_reason(&self) -> Option<&str> {
        match self {
            Self::Active => None,
            Self::Eliminated { reason } => Some(reason),
        }
    }

    /// Guards an action that only active players may take.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyEliminated` if the player is eliminated.
    pub fn ensure_active(&self, player_id: Uuid) -> Result<(), DomainError> {
        match self {
            Self::Active => Ok(()),
            Self::Eliminated { .. } => Err(DomainError::AlreadyEliminated { player_id }),
        }
    }

    /// Applies an evaluation outcome.
    #[must_use]
    pub fn apply(self, evaluation: &EvaluationResult) -> Self {
        match self {
            Self::Active if evaluation.instant_death => Self::Eliminated {
                reason: evaluation
                    .death_reason
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DEATH_REASON.to_owned()),
            },
            other => other,
        }
    }
}

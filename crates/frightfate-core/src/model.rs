//! Persistent game records: sessions, players, answers and served scenarios.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::theme::Theme;

/// Lifecycle of a game session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Lobby is open; players may join.
    Waiting,
    /// Scenarios are being played.
    InProgress,
    /// Final results have been generated.
    Completed,
}

impl SessionStatus {
    /// Returns `true` if moving from `self` to `next` is a forward step.
    #[must_use]
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::InProgress)
                | (Self::Waiting | Self::InProgress, Self::Completed)
        )
    }
}

/// One played instance of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Short, human-shareable, unique code.
    pub session_code: String,
    /// Narrative archetype; fixed for the lifetime of the session.
    pub theme: Theme,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Highest question number served so far (0 before the first).
    pub current_question: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A participant in exactly one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier.
    pub id: Uuid,
    /// The session this player belongs to.
    pub session_code: String,
    /// Display name, unique within the session.
    pub name: String,
    /// Readiness flag toggled in the lobby.
    pub is_ready: bool,
    /// Position in the session's elimination sequence (1 = first to die).
    pub death_order: Option<u32>,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// A player's answer to one question.
///
/// Keyed by `(session_code, player_id, question_number)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAnswer {
    /// Owning session.
    pub session_code: String,
    /// Answering player.
    pub player_id: Uuid,
    /// 1-based question number.
    pub question_number: u32,
    /// Free-text decision as submitted.
    pub answer_text: String,
    /// Survival score in `[0, 100]`.
    pub score: u32,
    /// Why the player died on this answer. `Some` iff this answer eliminated
    /// the player.
    pub elimination_reason: Option<String>,
    /// Narrative consequence of the answer, used as story context for the
    /// next scenario.
    pub story_progression: Option<String>,
    /// Timestamp of the latest write.
    pub answered_at: DateTime<Utc>,
}

impl PlayerAnswer {
    /// Returns `true` if this answer eliminated the player.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.elimination_reason.is_some()
    }
}

/// Sum of scores over a player's answers.
#[must_use]
pub fn total_score(answers: &[PlayerAnswer]) -> u32 {
    answers.iter().map(|a| a.score).sum()
}

/// Whether an upsert created a new answer or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// No answer existed for the key.
    Inserted,
    /// An existing answer for the key was overwritten in place.
    Updated,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(score: u32, elimination_reason: Option<&str>) -> PlayerAnswer {
        PlayerAnswer {
            session_code: "ABC123".to_owned(),
            player_id: Uuid::new_v4(),
            question_number: 1,
            answer_text: "hide".to_owned(),
            score,
            elimination_reason: elimination_reason.map(str::to_owned),
            story_progression: None,
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_only_moves_forward() {
        assert!(SessionStatus::Waiting.can_transition_to(SessionStatus::InProgress));
        assert!(SessionStatus::InProgress.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Waiting.can_transition_to(SessionStatus::Completed));
        assert!(!SessionStatus::InProgress.can_transition_to(SessionStatus::Waiting));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::InProgress));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Completed));
    }

    #[test]
    fn test_total_score_sums_answers() {
        let answers = vec![answer(40, None), answer(25, None), answer(10, Some("eaten"))];
        assert_eq!(total_score(&answers), 75);
        assert_eq!(total_score(&[]), 0);
    }

    #[test]
    fn test_is_eliminated_follows_reason() {
        assert!(!answer(80, None).is_eliminated());
        assert!(answer(5, Some("fell")).is_eliminated());
    }
}

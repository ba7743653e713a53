//! Session store port.
//!
//! The engine never talks to a database directly; every read and write goes
//! through this trait. Implementations must make `upsert_answer` atomic per
//! `(session_code, player_id, question_number)` and `assign_death_order`
//! atomic per session.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{GameSession, Player, PlayerAnswer, SessionStatus, UpsertOutcome};
use crate::scenario::Scenario;

/// Persistence for sessions, players, answers and served scenarios.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new session.
    ///
    /// # Errors
    ///
    /// `DomainError::Conflict` if the session code is already taken.
    async fn create_session(&self, session: GameSession) -> Result<(), DomainError>;

    /// Looks up a session by code.
    async fn find_session(&self, session_code: &str) -> Result<Option<GameSession>, DomainError>;

    /// Overwrites a session's status.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` if the session does not exist.
    async fn set_session_status(
        &self,
        session_code: &str,
        status: SessionStatus,
    ) -> Result<(), DomainError>;

    /// Raises `current_question` to `question_number` if it is currently lower.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` if the session does not exist.
    async fn raise_current_question(
        &self,
        session_code: &str,
        question_number: u32,
    ) -> Result<(), DomainError>;

    /// Adds a player to its session.
    ///
    /// # Errors
    ///
    /// `DomainError::Conflict` if the name is taken within the session,
    /// `DomainError::NotFound` if the session does not exist.
    async fn add_player(&self, player: Player) -> Result<(), DomainError>;

    /// Looks up a player within a session.
    async fn find_player(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<Option<Player>, DomainError>;

    /// All players of a session in join order.
    async fn list_players(&self, session_code: &str) -> Result<Vec<Player>, DomainError>;

    /// Sets a player's readiness flag.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` if the player does not exist.
    async fn set_player_ready(
        &self,
        session_code: &str,
        player_id: Uuid,
        ready: bool,
    ) -> Result<(), DomainError>;

    /// Gives the player the next free position in the session's elimination
    /// sequence and returns it. Idempotent for a player that already has one.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` if the player does not exist.
    async fn assign_death_order(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<u32, DomainError>;

    /// Inserts the answer, or overwrites the existing answer with the same key.
    async fn upsert_answer(&self, answer: PlayerAnswer) -> Result<UpsertOutcome, DomainError>;

    /// A player's answers ordered by question number.
    async fn list_answers(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<Vec<PlayerAnswer>, DomainError>;

    /// The player's most recently recorded answer, by write order rather
    /// than question number.
    async fn latest_answer(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<Option<PlayerAnswer>, DomainError>;

    /// Remembers the scenario served to a player so the answer to it can be
    /// evaluated against the same content. Overwrites a previous record for
    /// the same question.
    async fn record_scenario(
        &self,
        session_code: &str,
        player_id: Uuid,
        scenario: &Scenario,
    ) -> Result<(), DomainError>;

    /// The scenario previously served for the question, if any.
    async fn find_scenario(
        &self,
        session_code: &str,
        player_id: Uuid,
        question_number: u32,
    ) -> Result<Option<Scenario>, DomainError>;
}

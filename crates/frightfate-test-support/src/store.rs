//! Test stores — mock `SessionStore` implementations for tests.

use async_trait::async_trait;
use frightfate_core::error::DomainError;
use frightfate_core::model::{GameSession, Player, PlayerAnswer, SessionStatus, UpsertOutcome};
use frightfate_core::scenario::Scenario;
use frightfate_core::store::SessionStore;
use uuid::Uuid;

fn refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

/// A session store that fails every operation with an infrastructure error.
/// Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn create_session(&self, _session: GameSession) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn find_session(&self, _session_code: &str) -> Result<Option<GameSession>, DomainError> {
        Err(refused())
    }

    async fn set_session_status(
        &self,
        _session_code: &str,
        _status: SessionStatus,
    ) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn raise_current_question(
        &self,
        _session_code: &str,
        _question_number: u32,
    ) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn add_player(&self, _player: Player) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn find_player(
        &self,
        _session_code: &str,
        _player_id: Uuid,
    ) -> Result<Option<Player>, DomainError> {
        Err(refused())
    }

    async fn list_players(&self, _session_code: &str) -> Result<Vec<Player>, DomainError> {
        Err(refused())
    }

    async fn set_player_ready(
        &self,
        _session_code: &str,
        _player_id: Uuid,
        _ready: bool,
    ) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn assign_death_order(
        &self,
        _session_code: &str,
        _player_id: Uuid,
    ) -> Result<u32, DomainError> {
        Err(refused())
    }

    async fn upsert_answer(&self, _answer: PlayerAnswer) -> Result<UpsertOutcome, DomainError> {
        Err(refused())
    }

    async fn list_answers(
        &self,
        _session_code: &str,
        _player_id: Uuid,
    ) -> Result<Vec<PlayerAnswer>, DomainError> {
        Err(refused())
    }

    async fn latest_answer(
        &self,
        _session_code: &str,
        _player_id: Uuid,
    ) -> Result<Option<PlayerAnswer>, DomainError> {
        Err(refused())
    }

    async fn record_scenario(
        &self,
        _session_code: &str,
        _player_id: Uuid,
        _scenario: &Scenario,
    ) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn find_scenario(
        &self,
        _session_code: &str,
        _player_id: Uuid,
        _question_number: u32,
    ) -> Result<Option<Scenario>, DomainError> {
        Err(refused())
    }
}

//! In-process implementation of the `SessionStore` trait.
//!
//! All state sits behind one `RwLock`. No lock is held across an await
//! point, and every read-modify-write (answer upsert, death order) happens
//! inside a single write guard, which gives the per-key atomicity the
//! engine relies on.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use frightfate_core::error::DomainError;
use frightfate_core::model::{GameSession, Player, PlayerAnswer, SessionStatus, UpsertOutcome};
use frightfate_core::scenario::Scenario;
use frightfate_core::store::SessionStore;

#[derive(Debug)]
struct StoredAnswer {
    /// Write sequence within the session; higher is more recent.
    seq: u64,
    answer: PlayerAnswer,
}

#[derive(Debug)]
struct SessionRecord {
    session: GameSession,
    players: Vec<Player>,
    answers: BTreeMap<(Uuid, u32), StoredAnswer>,
    answer_writes: u64,
    scenarios: HashMap<(Uuid, u32), Scenario>,
    eliminated_count: u32,
}

impl SessionRecord {
    fn player_mut(&mut self, player_id: Uuid) -> Result<&mut Player, DomainError> {
        self.players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| DomainError::player_not_found(player_id))
    }
}

/// Session store kept entirely in memory. State is lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::Infrastructure("session store lock poisoned".into())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, session: GameSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if sessions.contains_key(&session.session_code) {
            return Err(DomainError::Conflict(format!(
                "session code {} already in use",
                session.session_code
            )));
        }
        debug!(session_code = %session.session_code, "session created");
        sessions.insert(
            session.session_code.clone(),
            SessionRecord {
                session,
                players: Vec::new(),
                answers: BTreeMap::new(),
                answer_writes: 0,
                scenarios: HashMap::new(),
                eliminated_count: 0,
            },
        );
        Ok(())
    }

    async fn find_session(&self, session_code: &str) -> Result<Option<GameSession>, DomainError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(session_code).map(|r| r.session.clone()))
    }

    async fn set_session_status(
        &self,
        session_code: &str,
        status: SessionStatus,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let record = sessions
            .get_mut(session_code)
            .ok_or_else(|| DomainError::session_not_found(session_code))?;
        record.session.status = status;
        Ok(())
    }

    async fn raise_current_question(
        &self,
        session_code: &str,
        question_number: u32,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let record = sessions
            .get_mut(session_code)
            .ok_or_else(|| DomainError::session_not_found(session_code))?;
        record.session.current_question = record.session.current_question.max(question_number);
        Ok(())
    }

    async fn add_player(&self, player: Player) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let record = sessions
            .get_mut(&player.session_code)
            .ok_or_else(|| DomainError::session_not_found(&player.session_code))?;
        if record.players.iter().any(|p| p.name == player.name) {
            return Err(DomainError::Conflict(format!(
                "player name {} already taken in this session",
                player.name
            )));
        }
        record.players.push(player);
        Ok(())
    }

    async fn find_player(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<Option<Player>, DomainError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions
            .get(session_code)
            .and_then(|r| r.players.iter().find(|p| p.id == player_id))
            .cloned())
    }

    async fn list_players(&self, session_code: &str) -> Result<Vec<Player>, DomainError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions
            .get(session_code)
            .map(|r| r.players.clone())
            .unwrap_or_default())
    }

    async fn set_player_ready(
        &self,
        session_code: &str,
        player_id: Uuid,
        ready: bool,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let record = sessions
            .get_mut(session_code)
            .ok_or_else(|| DomainError::session_not_found(session_code))?;
        record.player_mut(player_id)?.is_ready = ready;
        Ok(())
    }

    async fn assign_death_order(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<u32, DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let record = sessions
            .get_mut(session_code)
            .ok_or_else(|| DomainError::session_not_found(session_code))?;
        let next = record.eliminated_count + 1;
        let player = record.player_mut(player_id)?;
        if let Some(order) = player.death_order {
            return Ok(order);
        }
        player.death_order = Some(next);
        record.eliminated_count = next;
        Ok(next)
    }

    async fn upsert_answer(&self, answer: PlayerAnswer) -> Result<UpsertOutcome, DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let record = sessions
            .get_mut(&answer.session_code)
            .ok_or_else(|| DomainError::session_not_found(&answer.session_code))?;
        let key = (answer.player_id, answer.question_number);
        record.answer_writes += 1;
        let stored = StoredAnswer {
            seq: record.answer_writes,
            answer,
        };
        let outcome = match record.answers.insert(key, stored) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        };
        Ok(outcome)
    }

    async fn list_answers(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<Vec<PlayerAnswer>, DomainError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions
            .get(session_code)
            .map(|r| {
                r.answers
                    .range((player_id, 0)..=(player_id, u32::MAX))
                    .map(|(_, stored)| stored.answer.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn latest_answer(
        &self,
        session_code: &str,
        player_id: Uuid,
    ) -> Result<Option<PlayerAnswer>, DomainError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(session_code).and_then(|r| {
            r.answers
                .range((player_id, 0)..=(player_id, u32::MAX))
                .map(|(_, stored)| stored)
                .max_by_key(|stored| stored.seq)
                .map(|stored| stored.answer.clone())
        }))
    }

    async fn record_scenario(
        &self,
        session_code: &str,
        player_id: Uuid,
        scenario: &Scenario,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let record = sessions
            .get_mut(session_code)
            .ok_or_else(|| DomainError::session_not_found(session_code))?;
        record
            .scenarios
            .insert((player_id, scenario.question_number), scenario.clone());
        Ok(())
    }

    async fn find_scenario(
        &self,
        session_code: &str,
        player_id: Uuid,
        question_number: u32,
    ) -> Result<Option<Scenario>, DomainError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions
            .get(session_code)
            .and_then(|r| r.scenarios.get(&(player_id, question_number)))
            .cloned())
    }
}

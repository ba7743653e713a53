//! Query handlers for the session context.

use frightfate_core::error::DomainError;
use frightfate_core::model::{SessionStatus, total_score};
use frightfate_core::store::SessionStore;
use frightfate_core::theme::Theme;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;

/// One player as shown in the lobby and during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// Player identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Readiness flag.
    pub is_ready: bool,
    /// Sum of the player's answer scores.
    pub total_score: u32,
    /// Whether the player's most recently recorded answer eliminated them.
    pub is_eliminated: bool,
    /// Why, if eliminated.
    pub elimination_reason: Option<String>,
    /// Position in the death sequence, if eliminated.
    pub death_order: Option<u32>,
}

/// Read-only view of a session and its roster.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Session code.
    pub session_code: String,
    /// Narrative theme.
    pub theme: Theme,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Highest question served so far.
    pub current_question: u32,
    /// Players still in the game, in join order.
    pub players: Vec<PlayerView>,
    /// Eliminated players, in join order.
    pub eliminated_players: Vec<PlayerView>,
    /// Roster size.
    pub total_players: usize,
}

/// Retrieves a session with every player's standing.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session does not exist, and any
/// store failure.
pub async fn get_session_view(
    session_code: &str,
    store: &dyn SessionStore,
) -> Result<SessionView, DomainError> {
    let session = command_handlers::load_session(store, session_code).await?;
    let players = store.list_players(session_code).await?;
    let total_players = players.len();

    let mut active = Vec::new();
    let mut eliminated = Vec::new();
    for player in players {
        let answers = store.list_answers(session_code, player.id).await?;
        let elimination_reason = store
            .latest_answer(session_code, player.id)
            .await?
            .and_then(|a| a.elimination_reason);
        let view = PlayerView {
            id: player.id,
            name: player.name,
            is_ready: player.is_ready,
            total_score: total_score(&answers),
            is_eliminated: elimination_reason.is_some(),
            elimination_reason,
            death_order: player.death_order,
        };
        if view.is_eliminated {
            eliminated.push(view);
        } else {
            active.push(view);
        }
    }

    Ok(SessionView {
        session_code: session.session_code,
        theme: session.theme,
        status: session.status,
        current_question: session.current_question,
        players: active,
        eliminated_players: eliminated,
        total_players,
    })
}

//! Query handlers for the narrative context.

use frightfate_core::error::DomainError;
use frightfate_core::store::SessionStore;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;

/// Whether a player may keep playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EliminationView {
    /// Set once the player has been eliminated.
    pub is_eliminated: bool,
    /// Why, if eliminated.
    pub elimination_reason: Option<String>,
    /// The inverse of `is_eliminated`.
    pub can_continue: bool,
}

/// Reports a player's elimination status from their most recent answer.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session or player does not exist.
pub async fn check_elimination(
    session_code: &str,
    player_id: Uuid,
    store: &dyn SessionStore,
) -> Result<EliminationView, DomainError> {
    command_handlers::load_session(store, session_code).await?;
    command_handlers::load_player(store, session_code, player_id).await?;
    let status = command_handlers::player_status(store, session_code, player_id).await?;
    Ok(EliminationView {
        is_eliminated: status.is_eliminated(),
        elimination_reason: status.elimination_reason().map(str::to_owned),
        can_continue: !status.is_eliminated(),
    })
}

//! Command handlers for the session context.

use std::sync::Mutex;

use frightfate_core::clock::Clock;
use frightfate_core::error::DomainError;
use frightfate_core::model::{GameSession, Player, SessionStatus};
use frightfate_core::rng::DeterministicRng;
use frightfate_core::store::SessionStore;
use frightfate_core::theme::Theme;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::commands::{CreateSession, JoinSession, MarkReady, StartSession};
use crate::domain::session_code;

/// Codes drawn before giving up on finding a free one.
pub const MAX_CODE_ATTEMPTS: usize = 8;

pub(crate) async fn load_session(
    store: &dyn SessionStore,
    session_code: &str,
) -> Result<GameSession, DomainError> {
    store
        .find_session(session_code)
        .await?
        .ok_or_else(|| DomainError::session_not_found(session_code))
}

/// Handles the `CreateSession` command: allocates a free code and stores a
/// waiting session.
///
/// # Errors
///
/// Returns `DomainError::Conflict` if no free code turns up within
/// [`MAX_CODE_ATTEMPTS`] draws, and any store failure.
pub async fn handle_create_session(
    command: &CreateSession,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &dyn SessionStore,
) -> Result<GameSession, DomainError> {
    let theme = command
        .theme
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(Theme::default, Theme::parse);

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        // Lock RNG only to draw the code, never across an await.
        let code = {
            let mut guard = rng
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            session_code::generate(&mut *guard)
        };

        let session = GameSession {
            session_code: code,
            theme: theme.clone(),
            status: SessionStatus::Waiting,
            current_question: 0,
            created_at: clock.now(),
        };
        match store.create_session(session.clone()).await {
            Ok(()) => {
                info!(
                    correlation_id = %command.correlation_id,
                    session_code = %session.session_code,
                    theme = %session.theme,
                    "session created"
                );
                return Ok(session);
            }
            Err(DomainError::Conflict(_)) => {
                debug!(attempt, "session code collision, drawing again");
            }
            Err(other) => return Err(other),
        }
    }

    Err(DomainError::Conflict(format!(
        "no free session code after {MAX_CODE_ATTEMPTS} attempts"
    )))
}

/// Handles the `JoinSession` command: adds a player to a waiting session.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank or overlong name,
/// `NotFound` for an unknown session, `Conflict` if the session is no longer
/// waiting or the name is taken, and any store failure.
pub async fn handle_join_session(
    command: &JoinSession,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<Player, DomainError> {
    let name = session_code::player_name(&command.player_name)?;
    let session = load_session(store, &command.session_code).await?;
    if session.status != SessionStatus::Waiting {
        return Err(DomainError::Conflict(format!(
            "session {} is not accepting new players",
            session.session_code
        )));
    }

    let player = Player {
        id: Uuid::new_v4(),
        session_code: session.session_code,
        name,
        is_ready: false,
        death_order: None,
        joined_at: clock.now(),
    };
    store.add_player(player.clone()).await?;

    info!(
        correlation_id = %command.correlation_id,
        session_code = %player.session_code,
        player_id = %player.id,
        "player joined"
    );
    Ok(player)
}

/// Handles the `MarkReady` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown session or player, and any
/// store failure.
pub async fn handle_mark_ready(
    command: &MarkReady,
    store: &dyn SessionStore,
) -> Result<Player, DomainError> {
    load_session(store, &command.session_code).await?;
    store
        .set_player_ready(&command.session_code, command.player_id, command.ready)
        .await?;
    let player = store
        .find_player(&command.session_code, command.player_id)
        .await?
        .ok_or_else(|| DomainError::player_not_found(command.player_id))?;

    info!(
        correlation_id = %command.correlation_id,
        player_id = %player.id,
        ready = player.is_ready,
        "player readiness changed"
    );
    Ok(player)
}

/// Handles the `StartSession` command: moves a waiting session with at least
/// one player into play.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown session, `Conflict` if it
/// is not waiting or has no players, and any store failure.
pub async fn handle_start_session(
    command: &StartSession,
    store: &dyn SessionStore,
) -> Result<GameSession, DomainError> {
    let mut session = load_session(store, &command.session_code).await?;
    if !session.status.can_transition_to(SessionStatus::InProgress) {
        return Err(DomainError::Conflict(format!(
            "session {} has already started",
            session.session_code
        )));
    }
    if store.list_players(&session.session_code).await?.is_empty() {
        return Err(DomainError::Conflict(format!(
            "session {} has no players",
            session.session_code
        )));
    }

    store
        .set_session_status(&session.session_code, SessionStatus::InProgress)
        .await?;
    session.status = SessionStatus::InProgress;

    info!(
        correlation_id = %command.correlation_id,
        session_code = %session.session_code,
        "session started"
    );
    Ok(session)
}

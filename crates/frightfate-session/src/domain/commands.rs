//! Commands for the session context.

use uuid::Uuid;

/// Open a new lobby.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Theme name; `None` picks the default theme.
    pub theme: Option<String>,
}

/// Add a player to a waiting session.
#[derive(Debug, Clone)]
pub struct JoinSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Session to join.
    pub session_code: String,
    /// Requested display name.
    pub player_name: String,
}

/// Set a player's readiness flag.
#[derive(Debug, Clone)]
pub struct MarkReady {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Session the player belongs to.
    pub session_code: String,
    /// The player.
    pub player_id: Uuid,
    /// New readiness.
    pub ready: bool,
}

/// Close the lobby and begin play.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Session to start.
    pub session_code: String,
}

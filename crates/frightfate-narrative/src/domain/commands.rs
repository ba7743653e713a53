//! Commands for the narrative context.

use uuid::Uuid;

/// Fetch (or generate) the scenario for a player's next question.
#[derive(Debug, Clone)]
pub struct GetScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Session the player belongs to.
    pub session_code: String,
    /// Requesting player.
    pub player_id: Uuid,
    /// 1-based question number.
    pub question_number: u32,
}

/// Submit a player's free-text decision for a question.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Session the player belongs to.
    pub session_code: String,
    /// Answering player.
    pub player_id: Uuid,
    /// 1-based question number.
    pub question_number: u32,
    /// The decision.
    pub answer_text: String,
}

/// Rank every player and write their fates; completes the session.
#[derive(Debug, Clone)]
pub struct FinalizeResults {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Session to finalize.
    pub session_code: String,
}

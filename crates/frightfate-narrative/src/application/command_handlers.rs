//! Command handlers for the narrative context.
//!
//! Each handler loads what it needs from the session store, runs the engine,
//! and writes the outcome back. Oracle trouble never surfaces here; only
//! store failures and caller mistakes do.

use frightfate_core::clock::Clock;
use frightfate_core::error::DomainError;
use frightfate_core::model::{
    GameSession, Player, PlayerAnswer, SessionStatus, UpsertOutcome, total_score,
};
use frightfate_core::scenario::Scenario;
use frightfate_core::store::SessionStore;
use frightfate_core::theme::Theme;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::engine::NarrativeEngine;
use crate::domain::choice_pattern::ChoicePattern;
use crate::domain::commands::{FinalizeResults, GetScenario, SubmitAnswer};
use crate::domain::elimination::PlayerStatus;
use crate::domain::evaluation::{ChoiceClassification, ChoiceRecord, history_scores};
use crate::domain::fallback::FallbackPolicy;
use crate::domain::results::{DeathNarrative, PlayerFate, RosterEntry};

/// Outcome of a submitted answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerReceipt {
    /// The question answered.
    pub question_number: u32,
    /// Survival score in `[0, 100]`.
    pub score: u32,
    /// Explanation of the score.
    pub analysis: String,
    /// What happens next in the story.
    pub story_progression: String,
    /// Qualitative label.
    pub classification: ChoiceClassification,
    /// Whether this answer eliminated the player.
    pub instant_death: bool,
    /// Why the player died, if they did.
    pub elimination_reason: Option<String>,
    /// Position in the session's death sequence, if eliminated.
    pub death_order: Option<u32>,
    /// Personal death scene, if eliminated.
    pub death_narrative: Option<DeathNarrative>,
    /// The player's running total after this answer.
    pub total_score: u32,
    /// Whether the answer was new or overwrote an earlier submission.
    pub outcome: UpsertOutcome,
}

/// Final results of a session.
#[derive(Debug, Clone, Serialize)]
pub struct FinalResults {
    /// One fate per player, in rank order.
    pub results: Vec<PlayerFate>,
    /// Players never eliminated.
    pub survivors: usize,
    /// Players eliminated during play.
    pub eliminated: usize,
    /// Roster size.
    pub total_players: usize,
}

pub(crate) async fn load_session(
    store: &dyn SessionStore,
    session_code: &str,
) -> Result<GameSession, DomainError> {
    store
        .find_session(session_code)
        .await?
        .ok_or_else(|| DomainError::session_not_found(session_code))
}

pub(crate) async fn load_player(
    store: &dyn SessionStore,
    session_code: &str,
    player_id: Uuid,
) -> Result<Player, DomainError> {
    store
        .find_player(session_code, player_id)
        .await?
        .ok_or_else(|| DomainError::player_not_found(player_id))
}

/// Current status of a player, derived from their most recently recorded
/// answer.
pub(crate) async fn player_status(
    store: &dyn SessionStore,
    session_code: &str,
    player_id: Uuid,
) -> Result<PlayerStatus, DomainError> {
    let latest = store.latest_answer(session_code, player_id).await?;
    Ok(PlayerStatus::from_latest_answer(latest.as_ref()))
}

fn ensure_playable(session: &GameSession) -> Result<(), DomainError> {
    if session.status == SessionStatus::Completed {
        return Err(DomainError::Conflict(format!(
            "session {} has already finished",
            session.session_code
        )));
    }
    Ok(())
}

/// Answers before `question_number`, oldest first.
fn choice_history(answers: &[PlayerAnswer], question_number: u32) -> Vec<ChoiceRecord> {
    answers
        .iter()
        .filter(|a| a.question_number < question_number)
        .map(|a| ChoiceRecord {
            question_number: a.question_number,
            answer_text: a.answer_text.clone(),
            score: a.score,
        })
        .collect()
}

/// The deterministic scenario for a question, used when nothing was served.
fn fallback_scenario(
    theme: &Theme,
    question_number: u32,
    history: &[ChoiceRecord],
    story_context: &str,
) -> Scenario {
    if question_number <= 1 {
        return FallbackPolicy::initial_scenario(theme);
    }
    let pattern = ChoicePattern::classify(&history_scores(history));
    FallbackPolicy::next_scenario(theme, question_number, pattern, story_context)
}

async fn roster_entry(
    store: &dyn SessionStore,
    player: &Player,
) -> Result<RosterEntry, DomainError> {
    let answers = store.list_answers(&player.session_code, player.id).await?;
    let status = player_status(store, &player.session_code, player.id).await?;
    Ok(RosterEntry {
        player_id: player.id,
        player_name: player.name.clone(),
        total_score: total_score(&answers),
        answer_count: answers.len(),
        elimination_reason: status.elimination_reason().map(str::to_owned),
        death_order: player.death_order,
    })
}

fn validate_question_number(question_number: u32) -> Result<(), DomainError> {
    if question_number == 0 {
        return Err(DomainError::Validation(
            "question_number starts at 1".to_owned(),
        ));
    }
    Ok(())
}

/// Handles the `GetScenario` command: serves the scenario for a player's
/// question, generating and recording it on first request.
///
/// # Errors
///
/// Returns `DomainError::Validation` for question 0, `NotFound` for an
/// unknown session or player, `Conflict` for a finished session,
/// `AlreadyEliminated` for an eliminated player, and any store failure.
#[instrument(
    skip_all,
    fields(
        correlation_id = %command.correlation_id,
        session_code = %command.session_code,
        player_id = %command.player_id,
        question_number = command.question_number
    )
)]
pub async fn handle_get_scenario(
    command: &GetScenario,
    engine: &NarrativeEngine,
    store: &dyn SessionStore,
) -> Result<Scenario, DomainError> {
    validate_question_number(command.question_number)?;
    let session = load_session(store, &command.session_code).await?;
    ensure_playable(&session)?;
    load_player(store, &command.session_code, command.player_id).await?;
    player_status(store, &command.session_code, command.player_id)
        .await?
        .ensure_active(command.player_id)?;

    if let Some(served) = store
        .find_scenario(&command.session_code, command.player_id, command.question_number)
        .await?
    {
        return Ok(served);
    }

    let scenario = if command.question_number == 1 {
        engine.scenarios.generate_initial(&session.theme).await
    } else {
        let previous = command.question_number - 1;
        let answers = store
            .list_answers(&command.session_code, command.player_id)
            .await?;
        let history = choice_history(&answers, command.question_number);

        let progression = answers
            .iter()
            .find(|a| a.question_number == previous)
            .and_then(|a| a.story_progression.clone())
            .filter(|p| !p.trim().is_empty());
        let story_context = match progression {
            Some(progression) => progression,
            None => store
                .find_scenario(&command.session_code, command.player_id, previous)
                .await?
                .map(|s| s.story_context)
                .unwrap_or_default(),
        };

        match engine
            .scenarios
            .generate_next(&session.theme, command.question_number, &history, &story_context)
            .await
        {
            Some(scenario) => scenario,
            None => {
                warn!("serving fallback scenario");
                fallback_scenario(&session.theme, command.question_number, &history, &story_context)
            }
        }
    };

    store
        .record_scenario(&command.session_code, command.player_id, &scenario)
        .await?;
    store
        .raise_current_question(&command.session_code, command.question_number)
        .await?;

    info!(risk = ?scenario.death_risk_level, "scenario served");
    Ok(scenario)
}

/// Handles the `SubmitAnswer` command: scores the answer, records it, and
/// eliminates the player if the answer was fatal.
///
/// Eliminated players are rejected before any scoring, so a rejected
/// submission costs no oracle call and writes nothing.
///
/// # Errors
///
/// Returns `DomainError::Validation` for blank answers or question 0,
/// `NotFound` for an unknown session or player, `Conflict` for a finished
/// session, `AlreadyEliminated` for an eliminated player, and any store
/// failure.
#[instrument(
    skip_all,
    fields(
        correlation_id = %command.correlation_id,
        session_code = %command.session_code,
        player_id = %command.player_id,
        question_number = command.question_number
    )
)]
pub async fn handle_submit_answer(
    command: &SubmitAnswer,
    engine: &NarrativeEngine,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<AnswerReceipt, DomainError> {
    let answer_text = command.answer_text.trim();
    if answer_text.is_empty() {
        return Err(DomainError::Validation("answer_text is empty".to_owned()));
    }
    validate_question_number(command.question_number)?;

    let session = load_session(store, &command.session_code).await?;
    ensure_playable(&session)?;
    let player = load_player(store, &command.session_code, command.player_id).await?;
    let status = player_status(store, &command.session_code, command.player_id).await?;
    status.ensure_active(command.player_id)?;

    let answers = store
        .list_answers(&command.session_code, command.player_id)
        .await?;
    let history = choice_history(&answers, command.question_number);
    let scenario = match store
        .find_scenario(&command.session_code, command.player_id, command.question_number)
        .await?
    {
        Some(served) => served,
        None => {
            warn!("no served scenario on record, scoring against fallback scenario");
            fallback_scenario(&session.theme, command.question_number, &history, "")
        }
    };

    let evaluation = engine
        .evaluator
        .evaluate(&scenario, answer_text, &history)
        .await;
    let status = status.apply(&evaluation);

    let outcome = store
        .upsert_answer(PlayerAnswer {
            session_code: command.session_code.clone(),
            player_id: command.player_id,
            question_number: command.question_number,
            answer_text: answer_text.to_owned(),
            score: evaluation.score,
            elimination_reason: status.elimination_reason().map(str::to_owned),
            story_progression: Some(evaluation.story_progression.clone()),
            answered_at: clock.now(),
        })
        .await?;

    let (death_order, death_narrative) = if status.is_eliminated() {
        let order = store
            .assign_death_order(&command.session_code, command.player_id)
            .await?;
        let mut entry = roster_entry(store, &player).await?;
        entry.death_order = Some(order);
        let narrative = engine.results.narrate_death(&session.theme, &entry).await;
        info!(death_order = order, "player eliminated");
        (Some(order), Some(narrative))
    } else {
        (None, None)
    };

    let running_total = store
        .list_answers(&command.session_code, command.player_id)
        .await
        .map(|answers| total_score(&answers))?;

    info!(score = evaluation.score, ?outcome, "answer recorded");
    Ok(AnswerReceipt {
        question_number: command.question_number,
        score: evaluation.score,
        analysis: evaluation.analysis,
        story_progression: evaluation.story_progression,
        classification: evaluation.classification,
        instant_death: evaluation.instant_death,
        elimination_reason: status.elimination_reason().map(str::to_owned),
        death_order,
        death_narrative,
        total_score: running_total,
        outcome,
    })
}

/// Handles the `FinalizeResults` command: ranks every player, writes their
/// fates, and marks the session completed.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown session and any store
/// failure.
#[instrument(
    skip_all,
    fields(correlation_id = %command.correlation_id, session_code = %command.session_code)
)]
pub async fn handle_finalize_results(
    command: &FinalizeResults,
    engine: &NarrativeEngine,
    store: &dyn SessionStore,
) -> Result<FinalResults, DomainError> {
    let session = load_session(store, &command.session_code).await?;
    let players = store.list_players(&command.session_code).await?;

    let mut roster = Vec::with_capacity(players.len());
    for player in &players {
        roster.push(roster_entry(store, player).await?);
    }
    let eliminated = roster.iter().filter(|e| e.is_eliminated()).count();
    let total_players = roster.len();

    let results = engine.results.aggregate(&session.theme, roster).await;

    if session.status.can_transition_to(SessionStatus::Completed) {
        store
            .set_session_status(&command.session_code, SessionStatus::Completed)
            .await?;
    }

    info!(total_players, eliminated, "session completed");
    Ok(FinalResults {
        results,
        survivors: total_players - eliminated,
        eliminated,
        total_players,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use frightfate_core::oracle::NarrativeOracle;
    use frightfate_core::scenario::DeathRiskLevel;
    use frightfate_store::InMemorySessionStore;
    use frightfate_test_support::{FailingOracle, FailingSessionStore, FixedClock, ScriptedOracle};

    use super::*;
    use crate::application::config::NarrativeConfig;
    use crate::application::query_handlers::check_elimination;

    const SESSION: &str = "FRIGHT";

    fn engine(oracle: Arc<dyn NarrativeOracle>) -> NarrativeEngine {
        NarrativeEngine::new(oracle, NarrativeConfig::default())
    }

    async fn seeded_store(
        status: SessionStatus,
        names: &[&str],
    ) -> (InMemorySessionStore, Vec<Uuid>) {
        let store = InMemorySessionStore::new();
        store
            .create_session(GameSession {
                session_code: SESSION.to_owned(),
                theme: Theme::HauntedHouse,
                status,
                current_question: 0,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for name in names {
            let id = Uuid::new_v4();
            store
                .add_player(Player {
                    id,
                    session_code: SESSION.to_owned(),
                    name: (*name).to_owned(),
                    is_ready: true,
                    death_order: None,
                    joined_at: Utc::now(),
                })
                .await
                .unwrap();
            ids.push(id);
        }
        (store, ids)
    }

    fn get(player_id: Uuid, question_number: u32) -> GetScenario {
        GetScenario {
            correlation_id: Uuid::new_v4(),
            session_code: SESSION.to_owned(),
            player_id,
            question_number,
        }
    }

    fn submit(player_id: Uuid, question_number: u32, answer_text: &str) -> SubmitAnswer {
        SubmitAnswer {
            correlation_id: Uuid::new_v4(),
            session_code: SESSION.to_owned(),
            player_id,
            question_number,
            answer_text: answer_text.to_owned(),
        }
    }

    fn finalize() -> FinalizeResults {
        FinalizeResults {
            correlation_id: Uuid::new_v4(),
            session_code: SESSION.to_owned(),
        }
    }

    fn served(question_number: u32, risk: DeathRiskLevel, story_context: &str) -> Scenario {
        Scenario {
            question_number,
            title: "The Stairwell".to_owned(),
            description: "Footsteps echo from both directions. What do you do?".to_owned(),
            survival_factors: vec!["caution".to_owned()],
            story_context: story_context.to_owned(),
            death_risk_level: risk,
            branching_paths: Vec::new(),
            narrative_consequences: None,
        }
    }

    #[tokio::test]
    async fn test_first_scenario_is_recorded_and_refetch_is_stable() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada"]).await;
        let oracle = Arc::new(FailingOracle::default());
        let engine = engine(oracle.clone());

        // Act
        let first = handle_get_scenario(&get(ids[0], 1), &engine, &store).await.unwrap();
        let again = handle_get_scenario(&get(ids[0], 1), &engine, &store).await.unwrap();

        // Assert
        assert_eq!(first, FallbackPolicy::initial_scenario(&Theme::HauntedHouse));
        assert_eq!(first, again);
        assert_eq!(oracle.call_count(), 1);
        let session = store.find_session(SESSION).await.unwrap().unwrap();
        assert_eq!(session.current_question, 1);
    }

    #[tokio::test]
    async fn test_next_scenario_falls_back_with_story_progression_as_context() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada"]).await;
        let engine = engine(Arc::new(FailingOracle::default()));
        let clock = FixedClock::standard();
        handle_get_scenario(&get(ids[0], 1), &engine, &store).await.unwrap();
        let receipt = handle_submit_answer(
            &submit(ids[0], 1, "I carefully check the hallway and plan a safe route"),
            &engine,
            &clock,
            &store,
        )
        .await
        .unwrap();

        // Act
        let next = handle_get_scenario(&get(ids[0], 2), &engine, &store).await.unwrap();

        // Assert
        assert_eq!(next.question_number, 2);
        assert!(next.story_context.starts_with(&receipt.story_progression));
        assert!(next.story_context.contains("Chapter 2:"));
        assert_eq!(next.death_risk_level, DeathRiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_next_scenario_prompt_uses_previous_scenario_context_without_progression() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada"]).await;
        store
            .record_scenario(SESSION, ids[0], &served(1, DeathRiskLevel::Low, "The attic door slammed."))
            .await
            .unwrap();
        let oracle = Arc::new(ScriptedOracle::always("no json"));

        // Act
        handle_get_scenario(&get(ids[0], 2), &engine(oracle.clone()), &store)
            .await
            .unwrap();

        // Assert
        let prompt = &oracle.requests()[0].messages[1].content;
        assert!(prompt.contains("The attic door slammed."));
    }

    #[tokio::test]
    async fn test_submit_scores_against_served_scenario_and_overwrites_on_resubmit() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada"]).await;
        store
            .record_scenario(SESSION, ids[0], &served(1, DeathRiskLevel::Low, ""))
            .await
            .unwrap();
        let engine = engine(Arc::new(ScriptedOracle::sequence(vec![
            Ok(r#"{"survival_score": 40, "analysis": "Hmm."}"#.to_owned()),
            Ok(r#"{"survival_score": 85, "analysis": "Better."}"#.to_owned()),
        ])));
        let clock = FixedClock::standard();

        // Act
        let first = handle_submit_answer(&submit(ids[0], 1, "hide"), &engine, &clock, &store)
            .await
            .unwrap();
        let second =
            handle_submit_answer(&submit(ids[0], 1, "hide and listen"), &engine, &clock, &store)
                .await
                .unwrap();

        // Assert
        assert_eq!(first.outcome, UpsertOutcome::Inserted);
        assert_eq!(second.outcome, UpsertOutcome::Updated);
        assert_eq!(second.total_score, 85);
        let answers = store.list_answers(SESSION, ids[0]).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer_text, "hide and listen");
        assert_eq!(answers[0].answered_at, clock.0);
    }

    #[tokio::test]
    async fn test_fatal_answer_eliminates_with_death_order_and_narrative() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada", "Bo"]).await;
        for id in &ids {
            store
                .record_scenario(SESSION, *id, &served(1, DeathRiskLevel::Instant, ""))
                .await
                .unwrap();
        }
        let engine = engine(Arc::new(FailingOracle::default()));
        let clock = FixedClock::standard();

        // Act
        let ada = handle_submit_answer(&submit(ids[0], 1, "scream"), &engine, &clock, &store)
            .await
            .unwrap();
        let bo = handle_submit_answer(&submit(ids[1], 1, "panic and run"), &engine, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert!(ada.instant_death);
        assert_eq!(ada.death_order, Some(1));
        assert_eq!(bo.death_order, Some(2));
        let narrative = ada.death_narrative.unwrap();
        assert_eq!(narrative.player_name, "Ada");
        assert_eq!(Some(narrative.elimination_reason.as_str()), ada.elimination_reason.as_deref());
    }

    #[tokio::test]
    async fn test_eliminated_player_is_rejected_without_oracle_call_or_write() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada"]).await;
        store
            .record_scenario(SESSION, ids[0], &served(1, DeathRiskLevel::Instant, ""))
            .await
            .unwrap();
        let oracle = Arc::new(FailingOracle::default());
        let engine = engine(oracle.clone());
        let clock = FixedClock::standard();
        handle_submit_answer(&submit(ids[0], 1, "give up"), &engine, &clock, &store)
            .await
            .unwrap();
        let calls_before = oracle.call_count();

        // Act
        let resubmit =
            handle_submit_answer(&submit(ids[0], 1, "carefully think"), &engine, &clock, &store).await;
        let later = handle_submit_answer(&submit(ids[0], 2, "observe"), &engine, &clock, &store).await;
        let fetch = handle_get_scenario(&get(ids[0], 2), &engine, &store).await;

        // Assert
        assert!(matches!(resubmit, Err(DomainError::AlreadyEliminated { .. })));
        assert!(matches!(later, Err(DomainError::AlreadyEliminated { .. })));
        assert!(matches!(fetch, Err(DomainError::AlreadyEliminated { .. })));
        assert_eq!(oracle.call_count(), calls_before);
        let answers = store.list_answers(SESSION, ids[0]).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer_text, "give up");
    }

    #[tokio::test]
    async fn test_death_on_resubmitted_earlier_question_is_permanent() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada"]).await;
        for question in [1, 2] {
            store
                .record_scenario(SESSION, ids[0], &served(question, DeathRiskLevel::Instant, ""))
                .await
                .unwrap();
        }
        let engine = engine(Arc::new(ScriptedOracle::sequence(vec![
            Ok(r#"{"survival_score": 80, "analysis": "Quiet."}"#.to_owned()),
            Ok(r#"{"survival_score": 80, "analysis": "Still quiet."}"#.to_owned()),
            Ok(r#"{"survival_score": 10, "analysis": "It heard you."}"#.to_owned()),
        ])));
        let clock = FixedClock::standard();
        handle_submit_answer(&submit(ids[0], 1, "hide"), &engine, &clock, &store)
            .await
            .unwrap();
        handle_submit_answer(&submit(ids[0], 2, "hide"), &engine, &clock, &store)
            .await
            .unwrap();

        // Act
        let fatal = handle_submit_answer(&submit(ids[0], 1, "scream"), &engine, &clock, &store)
            .await
            .unwrap();
        let status = check_elimination(SESSION, ids[0], &store).await.unwrap();
        let next = handle_submit_answer(&submit(ids[0], 3, "run"), &engine, &clock, &store).await;
        let results = handle_finalize_results(&finalize(), &engine, &store).await.unwrap();

        // Assert
        assert!(fatal.instant_death);
        assert_eq!(fatal.death_order, Some(1));
        assert!(status.is_eliminated);
        assert!(!status.can_continue);
        assert_eq!(status.elimination_reason, fatal.elimination_reason);
        assert!(matches!(next, Err(DomainError::AlreadyEliminated { .. })));
        assert_eq!(results.survivors, 0);
        assert_eq!(results.eliminated, 1);
        assert!(!results.results[0].survived);
    }

    #[tokio::test]
    async fn test_submit_validates_input_and_references() {
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada"]).await;
        let engine = engine(Arc::new(FailingOracle::default()));
        let clock = FixedClock::standard();

        let blank = handle_submit_answer(&submit(ids[0], 1, "   "), &engine, &clock, &store).await;
        let zero = handle_submit_answer(&submit(ids[0], 0, "hide"), &engine, &clock, &store).await;
        let stranger =
            handle_submit_answer(&submit(Uuid::new_v4(), 1, "hide"), &engine, &clock, &store).await;

        assert!(matches!(blank, Err(DomainError::Validation(_))));
        assert!(matches!(zero, Err(DomainError::Validation(_))));
        assert!(matches!(stranger, Err(DomainError::NotFound { entity: "player", .. })));
    }

    #[tokio::test]
    async fn test_completed_session_rejects_play() {
        let (store, ids) = seeded_store(SessionStatus::Completed, &["Ada"]).await;
        let engine = engine(Arc::new(FailingOracle::default()));

        let result = handle_get_scenario(&get(ids[0], 1), &engine, &store).await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_finalize_ranks_everyone_and_completes_session() {
        // Arrange
        let (store, ids) = seeded_store(SessionStatus::InProgress, &["Ada", "Bo", "Cy"]).await;
        let engine = engine(Arc::new(FailingOracle::default()));
        let clock = FixedClock::standard();
        store
            .record_scenario(SESSION, ids[0], &served(1, DeathRiskLevel::Instant, ""))
            .await
            .unwrap();
        handle_submit_answer(&submit(ids[0], 1, "freeze"), &engine, &clock, &store)
            .await
            .unwrap();
        handle_submit_answer(&submit(ids[1], 1, "I carefully observe"), &engine, &clock, &store)
            .await
            .unwrap();
        handle_submit_answer(&submit(ids[2], 1, "look around"), &engine, &clock, &store)
            .await
            .unwrap();

        // Act
        let results = handle_finalize_results(&finalize(), &engine, &store).await.unwrap();

        // Assert
        assert_eq!(results.total_players, 3);
        assert_eq!(results.eliminated, 1);
        assert_eq!(results.survivors, 2);
        let names: Vec<_> = results.results.iter().map(|f| f.player_name.as_str()).collect();
        assert_eq!(names, vec!["Bo", "Cy", "Ada"]);
        assert!(results.results[0].survived);
        let session = store.find_session(SESSION).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_unknown_session_and_store_failure_propagate() {
        let engine = engine(Arc::new(FailingOracle::default()));

        let missing =
            handle_finalize_results(&finalize(), &engine, &InMemorySessionStore::new()).await;
        let broken = handle_finalize_results(&finalize(), &engine, &FailingSessionStore).await;

        assert!(matches!(missing, Err(DomainError::NotFound { entity: "session", .. })));
        assert!(matches!(broken, Err(DomainError::Infrastructure(_))));
    }
}

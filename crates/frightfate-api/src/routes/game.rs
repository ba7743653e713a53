//! Routes for play: scenarios, answers, elimination checks and results.

use axum::extract::{Path, Query, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use frightfate_core::scenario::Scenario;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use frightfate_narrative::application::command_handlers::{
    self, AnswerReceipt, FinalResults,
};
use frightfate_narrative::application::query_handlers::{self, EliminationView};
use frightfate_narrative::domain::commands;
use frightfate_session::domain::session_code::normalize;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for GET /sessions/{code}/scenarios/{question_number}.
#[derive(Debug, Deserialize)]
pub struct ScenarioQuery {
    /// Requesting player.
    pub player_id: Uuid,
}

/// Request body for POST /answers.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// Session the player belongs to.
    pub session_code: String,
    /// Answering player.
    pub player_id: Uuid,
    /// 1-based question number.
    pub question_number: u32,
    /// The decision.
    pub answer_text: String,
}

/// GET /sessions/{code}/scenarios/{question_number}?player_id=
#[instrument(
    skip_all,
    fields(session_code = %code, question_number = question_number, player_id = %query.player_id)
)]
async fn get_scenario(
    State(state): State<AppState>,
    Path((code, question_number)): Path<(String, u32)>,
    Query(query): Query<ScenarioQuery>,
) -> Result<Json<Scenario>, ApiError> {
    let command = commands::GetScenario {
        correlation_id: Uuid::new_v4(),
        session_code: normalize(&code),
        player_id: query.player_id,
        question_number,
    };

    info!(correlation_id = %command.correlation_id, "handling get_scenario command");

    let scenario =
        command_handlers::handle_get_scenario(&command, &state.engine, &*state.store).await?;

    Ok(Json(scenario))
}

/// POST /answers
#[instrument(
    skip_all,
    fields(
        session_code = %request.session_code,
        player_id = %request.player_id,
        question_number = request.question_number,
    )
)]
async fn submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerReceipt>, ApiError> {
    let command = commands::SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        session_code: normalize(&request.session_code),
        player_id: request.player_id,
        question_number: request.question_number,
        answer_text: request.answer_text,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_answer command");

    let receipt = command_handlers::handle_submit_answer(
        &command,
        &state.engine,
        state.clock.as_ref(),
        &*state.store,
    )
    .await?;

    Ok(Json(receipt))
}

/// GET /sessions/{code}/players/{player_id}/elimination
#[instrument(skip_all, fields(session_code = %code, player_id = %player_id))]
async fn check_elimination(
    State(state): State<AppState>,
    Path((code, player_id)): Path<(String, Uuid)>,
) -> Result<Json<EliminationView>, ApiError> {
    let view =
        query_handlers::check_elimination(&normalize(&code), player_id, &*state.store).await?;
    Ok(Json(view))
}

/// GET /sessions/{code}/results
#[instrument(skip_all, fields(session_code = %code))]
async fn get_results(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<FinalResults>, ApiError> {
    let command = commands::FinalizeResults {
        correlation_id: Uuid::new_v4(),
        session_code: normalize(&code),
    };

    info!(correlation_id = %command.correlation_id, "handling finalize_results command");

    let results =
        command_handlers::handle_finalize_results(&command, &state.engine, &*state.store).await?;

    Ok(Json(results))
}

/// Returns the router for play.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions/{code}/scenarios/{question_number}",
            get(get_scenario),
        )
        .route("/answers", post(submit_answer))
        .route(
            "/sessions/{code}/players/{player_id}/elimination",
            get(check_elimination),
        )
        .route("/sessions/{code}/results", get(get_results))
}

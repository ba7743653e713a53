//! Routes for the session lobby.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use frightfate_core::model::{GameSession, Player};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use frightfate_session::application::query_handlers::{self, SessionView};
use frightfate_session::application::command_handlers;
use frightfate_session::domain::commands;
use frightfate_session::domain::session_code::normalize;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /sessions.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Theme name; omitted picks the default.
    #[serde(default)]
    pub theme: Option<String>,
}

/// Request body for POST /sessions/{code}/players.
#[derive(Debug, Deserialize)]
pub struct JoinSessionRequest {
    /// Requested display name.
    pub player_name: String,
}

/// Request body for POST /sessions/{code}/players/{id}/ready.
#[derive(Debug, Deserialize)]
pub struct MarkReadyRequest {
    /// New readiness, `true` if omitted.
    #[serde(default = "ready_by_default")]
    pub ready: bool,
}

fn ready_by_default() -> bool {
    true
}

/// POST /sessions
#[instrument(skip_all)]
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<GameSession>, ApiError> {
    let command = commands::CreateSession {
        correlation_id: Uuid::new_v4(),
        theme: request.theme,
    };

    info!(correlation_id = %command.correlation_id, "handling create_session command");

    let session = command_handlers::handle_create_session(
        &command,
        state.clock.as_ref(),
        state.rng.as_ref(),
        &*state.store,
    )
    .await?;

    Ok(Json(session))
}

/// POST /sessions/{code}/players
#[instrument(skip_all, fields(session_code = %code))]
async fn join_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(request): Json<JoinSessionRequest>,
) -> Result<Json<Player>, ApiError> {
    let command = commands::JoinSession {
        correlation_id: Uuid::new_v4(),
        session_code: normalize(&code),
        player_name: request.player_name,
    };

    info!(correlation_id = %command.correlation_id, "handling join_session command");

    let player =
        command_handlers::handle_join_session(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok(Json(player))
}

/// POST /sessions/{code}/players/{player_id}/ready
#[instrument(skip_all, fields(session_code = %code, player_id = %player_id))]
async fn mark_ready(
    State(state): State<AppState>,
    Path((code, player_id)): Path<(String, Uuid)>,
    Json(request): Json<MarkReadyRequest>,
) -> Result<Json<Player>, ApiError> {
    let command = commands::MarkReady {
        correlation_id: Uuid::new_v4(),
        session_code: normalize(&code),
        player_id,
        ready: request.ready,
    };

    info!(correlation_id = %command.correlation_id, "handling mark_ready command");

    let player = command_handlers::handle_mark_ready(&command, &*state.store).await?;

    Ok(Json(player))
}

/// POST /sessions/{code}/start
#[instrument(skip_all, fields(session_code = %code))]
async fn start_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<GameSession>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
        session_code: normalize(&code),
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let session = command_handlers::handle_start_session(&command, &*state.store).await?;

    Ok(Json(session))
}

/// GET /sessions/{code}
#[instrument(skip_all, fields(session_code = %code))]
async fn get_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_view(&normalize(&code), &*state.store).await?;
    Ok(Json(view))
}

/// Returns the router for the session lobby.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{code}", get(get_session))
        .route("/sessions/{code}/players", post(join_session))
        .route("/sessions/{code}/players/{player_id}/ready", post(mark_ready))
        .route("/sessions/{code}/start", post(start_session))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::test_state::test_app_state;

    async fn send(app: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_session_defaults_to_haunted_house() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = send(app, "POST", "/sessions", serde_json::json!({})).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["theme"], "haunted_house");
        assert_eq!(json["status"], "waiting");
        assert_eq!(json["session_code"].as_str().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_join_accepts_lowercase_code() {
        // Arrange
        let state = test_app_state();
        let (_, session) = send(
            router().with_state(state.clone()),
            "POST",
            "/sessions",
            serde_json::json!({ "theme": "slasher_movie" }),
        )
        .await;
        let code = session["session_code"].as_str().unwrap().to_lowercase();

        // Act
        let (status, json) = send(
            router().with_state(state),
            "POST",
            &format!("/sessions/{code}/players"),
            serde_json::json!({ "player_name": "  Laurie " }),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Laurie");
        assert_eq!(json["is_ready"], false);
    }

    #[tokio::test]
    async fn test_start_empty_session_returns_409() {
        // Arrange
        let state = test_app_state();
        let (_, session) = send(
            router().with_state(state.clone()),
            "POST",
            "/sessions",
            serde_json::json!({}),
        )
        .await;
        let code = session["session_code"].as_str().unwrap().to_owned();

        // Act
        let (status, json) = send(
            router().with_state(state),
            "POST",
            &format!("/sessions/{code}/start"),
            serde_json::json!({}),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "conflict");
    }

    #[tokio::test]
    async fn test_join_unknown_session_returns_404() {
        let app = router().with_state(test_app_state());

        let (status, json) = send(
            app,
            "POST",
            "/sessions/NOPE00/players",
            serde_json::json!({ "player_name": "Ash" }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }
}

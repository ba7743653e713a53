//! Route modules organized by bounded context.

pub mod game;
pub mod health;
pub mod sessions;
pub mod ws;

use axum::Router;

use crate::state::AppState;

/// Every route the server exposes, without middleware layers.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(ws::router())
        .nest(
            "/api/game",
            Router::new().merge(sessions::router()).merge(game::router()),
        )
}

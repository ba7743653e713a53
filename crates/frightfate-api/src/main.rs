//! FrightFate API server entry point.

use std::sync::{Arc, Mutex};

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use frightfate_api::config::ServerConfig;
use frightfate_api::error::AppError;
use frightfate_api::routes;
use frightfate_api::state::AppState;
use frightfate_core::clock::SystemClock;
use frightfate_core::oracle::NarrativeOracle;
use frightfate_core::rng::{DeterministicRng, OsSeededRng};
use frightfate_narrative::application::NarrativeEngine;
use frightfate_oracle::{DisabledOracle, GeminiOracle};
use frightfate_store::InMemorySessionStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting FrightFate API server");

    let config = ServerConfig::from_env()?;

    let oracle: Arc<dyn NarrativeOracle> = match &config.gemini_api_key {
        Some(key) => {
            let gemini = GeminiOracle::new(key.clone())
                .with_model(config.gemini_model.clone())
                .with_base_url(config.gemini_base_url.clone());
            tracing::info!(model = %gemini.model(), "narrative oracle enabled");
            Arc::new(gemini)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; every narrative call will use fallback content");
            Arc::new(DisabledOracle)
        }
    };

    // Build application state.
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(OsSeededRng::new()));
    let app_state = AppState::new(
        Arc::new(SystemClock),
        rng,
        Arc::new(InMemorySessionStore::new()),
        NarrativeEngine::new(oracle, config.narrative),
    );

    let origin = HeaderValue::from_str(&config.cors_allowed_origin)
        .map_err(|e| AppError::Config(format!("CORS_ALLOWED_ORIGIN is invalid: {e}")))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Start server.
    tracing::info!("Listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

//! Digital Shield - triage chatbot backend
//!
//! A session-backed finite-state-machine engine that walks users through
//! guided triage scenarios and surfaces recommended response actions.

mod api;
mod config;
mod fsm;
mod session;

use api::{create_router, AppState};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use config::Config;
use session::MemorySessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "digital_shield=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // Load the scenario set once; a failed load leaves the service up but
    // degraded (no scenarios to offer, health probe reports it).
    let scenarios = fsm::store::load(&config.scenarios_path).map(Arc::new);
    if scenarios.is_none() {
        tracing::warn!(
            path = %config.scenarios_path.display(),
            "Starting without scenarios; chatbot endpoints will reject requests"
        );
    }

    let sessions = Arc::new(MemorySessionStore::new(config.session_timeout));
    let _session_reaper = session::spawn_purge_task(sessions.clone(), SESSION_PURGE_INTERVAL);

    let state = AppState::new(scenarios, sessions, config.scenarios_path.clone());

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(compression)
        .layer(CatchPanicLayer::custom(handle_panic));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Digital Shield listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fail gracefully: an unexpected panic in a handler becomes a generic
/// degraded-service response instead of leaking internals.
fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    tracing::error!("Handler panicked; returning degraded-service response");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Service temporarily unavailable"})),
    )
        .into_response()
}

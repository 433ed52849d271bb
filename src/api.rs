//! HTTP API for the Digital Shield triage service
//!
//! The FSM core is invoked in-process from here; this layer owns session
//! lookup, cookie handling, and the translation of core outcomes into HTTP
//! results.

mod handlers;
mod security;
mod types;

pub use handlers::create_router;

use crate::fsm::ScenarioSet;
use crate::session::SessionStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Scenario set loaded once at startup; `None` when the source was
    /// missing or malformed (the service runs degraded, not at all).
    pub scenarios: Option<Arc<ScenarioSet>>,
    pub sessions: Arc<dyn SessionStore>,
    /// Source path kept around so the health probe can re-check it.
    pub scenarios_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        scenarios: Option<Arc<ScenarioSet>>,
        sessions: Arc<dyn SessionStore>,
        scenarios_path: PathBuf,
    ) -> Self {
        Self {
            scenarios,
            sessions,
            scenarios_path: Arc::new(scenarios_path),
        }
    }
}

//! Service configuration from environment variables.

use crate::session::DEFAULT_SESSION_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub scenarios_path: PathBuf,
    pub session_timeout: Duration,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let port = std::env::var("SHIELD_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let scenarios_path = std::env::var("SHIELD_SCENARIOS_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_SCENARIOS_PATH), PathBuf::from);

        let session_timeout = std::env::var("SHIELD_SESSION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_SESSION_TIMEOUT, Duration::from_secs);

        Self {
            port,
            scenarios_path,
            session_timeout,
        }
    }
}

//! Scenario store
//!
//! Loads the full scenario set from a JSON source. Loading is all-or-nothing:
//! a missing or malformed source yields no scenarios at all, never a partial
//! set. Failures are recovered here and surfaced to callers as absence; the
//! service decides what degraded behavior looks like.

use super::scenario::ScenarioSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a scenario source failed to load.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scenario source not found: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("scenario source is not valid JSON: {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the scenario set from `path`, surfacing the failure cause.
pub fn try_load(path: &Path) -> Result<ScenarioSet, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the scenario set from `path`, recovering failures as absence.
///
/// Both failure modes are logged; neither propagates. Callers must treat
/// `None` as "no scenarios available". The result may be cached process-wide
/// (there is no invalidation), but the function itself is cheap enough to
/// re-invoke on demand, e.g. from a health probe.
pub fn load(path: &Path) -> Option<ScenarioSet> {
    match try_load(path) {
        Ok(set) => {
            tracing::info!(path = %path.display(), scenarios = set.len(), "Loaded scenario set");
            Some(set)
        }
        Err(StoreError::NotFound { path, source }) => {
            tracing::error!(path = %path.display(), error = %source, "Scenario source not found");
            None
        }
        Err(StoreError::Malformed { path, source }) => {
            tracing::error!(path = %path.display(), error = %source, "Scenario source failed to parse");
            None
        }
    }
}

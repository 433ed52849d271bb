//! API request and response types

use crate::fsm::{ActionDef, OptionDef};
use serde::{Deserialize, Serialize};

/// Request to start a new chat against a scenario.
#[derive(Debug, Deserialize)]
pub struct StartChatRequest {
    #[serde(default)]
    pub scenario_id: String,
}

/// Request carrying the user's selected option token.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    #[serde(default)]
    pub input: String,
}

/// The chatbot's view of the conversation after any operation.
#[derive(Debug, Serialize)]
pub struct ChatStateResponse {
    pub message: String,
    pub options: Vec<OptionDef>,
    pub terminal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionDef>>,
}

impl ChatStateResponse {
    /// Payload returned when no chat session is active.
    pub fn idle() -> Self {
        Self {
            message: "No active chat session. Please start a new chat.".to_string(),
            options: Vec::new(),
            terminal: false,
            scenario_name: None,
            actions: None,
        }
    }
}

/// One entry in the scenario listing.
#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
}

/// Plain confirmation payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Literacy guide platform listing.
#[derive(Debug, Serialize)]
pub struct PlatformsResponse {
    pub platforms: Vec<String>,
}

/// Availability of the data files the service depends on.
#[derive(Debug, Serialize)]
pub struct DataFilesStatus {
    pub scenarios: bool,
    pub literacy: bool,
}

/// Health probe payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub data_files: DataFilesStatus,
    pub active_sessions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

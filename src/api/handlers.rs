//! HTTP request handlers

use super::types::{
    ChatStateResponse, DataFilesStatus, ErrorResponse, HealthResponse, MessageResponse,
    PlatformsResponse, RespondRequest, ScenarioSummary, StartChatRequest,
};
use super::security::set_security_headers;
use super::AppState;
use crate::fsm::{store, ChatbotFsm};
use crate::session::ChatSession;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

/// Cookie carrying the opaque session ID. Only the ID crosses the wire; the
/// conversation state stays server-side.
const SESSION_COOKIE: &str = "shield_session";

const SERVICE_NAME: &str = "digital-shield";

/// Platforms covered by the literacy guide.
const LITERACY_PLATFORMS: [&str; 5] = ["WhatsApp", "Facebook", "Instagram", "Twitter/X", "TikTok"];

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Triage chatbot
        .route("/api/chatbot/start", post(start_chat))
        .route("/api/chatbot/respond", post(respond_to_chat))
        .route("/api/chatbot/current_state", get(get_current_state))
        .route("/api/chatbot/scenarios", get(list_scenarios))
        .route("/api/chatbot/end_session", post(end_session))
        // Literacy guide
        .route("/api/literacy", get(literacy_home))
        .route("/api/literacy/platforms", get(literacy_platforms))
        // Health/status
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(middleware::from_fn(set_security_headers))
        .with_state(state)
}

// ============================================================
// Chatbot
// ============================================================

async fn start_chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<StartChatRequest>,
) -> Result<(CookieJar, Json<ChatStateResponse>), AppError> {
    let scenario = state
        .scenarios
        .as_ref()
        .and_then(|set| set.get(&req.scenario_id))
        .ok_or_else(|| AppError::BadRequest("Invalid scenario ID".to_string()))?;

    let fsm = ChatbotFsm::new(scenario)
        .ok_or_else(|| AppError::Internal("Scenario has no start state".to_string()))?;

    let session_id = jar
        .get(SESSION_COOKIE)
        .map_or_else(|| Uuid::new_v4().to_string(), |c| c.value().to_string());

    state
        .sessions
        .set(
            &session_id,
            ChatSession {
                scenario_id: req.scenario_id,
                state_key: fsm.state_key().to_string(),
            },
        )
        .await;

    tracing::info!(scenario = %scenario.name, "Started chat session");

    let response = ChatStateResponse {
        message: fsm.current_message().to_string(),
        options: fsm.current_options().to_vec(),
        terminal: fsm.is_terminal(),
        scenario_name: Some(scenario.name.clone()),
        actions: None,
    };

    Ok((jar.add(session_cookie(session_id)), Json(response)))
}

async fn respond_to_chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RespondRequest>,
) -> Result<Json<ChatStateResponse>, AppError> {
    let (session_id, session) = active_session(&state, &jar)
        .await
        .ok_or_else(no_active_session)?;

    let scenario = state
        .scenarios
        .as_ref()
        .and_then(|set| set.get(&session.scenario_id))
        .ok_or_else(|| AppError::BadRequest("Active scenario not found.".to_string()))?;

    // The persisted key must have come from a prior lookup against this
    // document; a miss means the session is stale. Drop it.
    let Some(mut fsm) = ChatbotFsm::resume(scenario, &session.state_key) else {
        state.sessions.clear(&session_id).await;
        return Err(no_active_session());
    };

    if !fsm.transition(&req.input) {
        return Err(AppError::BadRequest("Invalid option or transition.".to_string()));
    }

    let actions = if fsm.is_terminal() {
        // Conversation concluded: surface the actions and forget the session.
        state.sessions.clear(&session_id).await;
        Some(fsm.available_actions().to_vec())
    } else {
        state
            .sessions
            .set(
                &session_id,
                ChatSession {
                    scenario_id: session.scenario_id,
                    state_key: fsm.state_key().to_string(),
                },
            )
            .await;
        None
    };

    Ok(Json(ChatStateResponse {
        message: fsm.current_message().to_string(),
        options: fsm.current_options().to_vec(),
        terminal: fsm.is_terminal(),
        scenario_name: None,
        actions,
    }))
}

async fn get_current_state(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ChatStateResponse>, AppError> {
    let Some((session_id, session)) = active_session(&state, &jar).await else {
        return Ok(Json(ChatStateResponse::idle()));
    };

    let scenario = state
        .scenarios
        .as_ref()
        .and_then(|set| set.get(&session.scenario_id));

    let fsm = scenario.and_then(|doc| ChatbotFsm::resume(doc, &session.state_key));
    let (Some(scenario), Some(fsm)) = (scenario, fsm) else {
        state.sessions.clear(&session_id).await;
        return Err(AppError::BadRequest(
            "Active scenario not found, session cleared.".to_string(),
        ));
    };

    let actions = fsm.is_terminal().then(|| fsm.available_actions().to_vec());

    Ok(Json(ChatStateResponse {
        message: fsm.current_message().to_string(),
        options: fsm.current_options().to_vec(),
        terminal: fsm.is_terminal(),
        scenario_name: Some(scenario.name.clone()),
        actions,
    }))
}

async fn list_scenarios(State(state): State<AppState>) -> Json<Vec<ScenarioSummary>> {
    let mut summaries: Vec<ScenarioSummary> = state
        .scenarios
        .as_ref()
        .map(|set| set.iter())
        .into_iter()
        .flatten()
        .map(|(id, doc)| ScenarioSummary {
            id: id.clone(),
            name: doc.name.clone(),
        })
        .collect();
    summaries.sort_by(|a, b| a.id.cmp(&b.id));

    Json(summaries)
}

async fn end_session(State(state): State<AppState>, jar: CookieJar) -> Json<MessageResponse> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.clear(cookie.value()).await;
    }

    Json(MessageResponse {
        message: "Chat session ended.".to_string(),
    })
}

/// Look up the live session named by the request's cookie, if any.
async fn active_session(state: &AppState, jar: &CookieJar) -> Option<(String, ChatSession)> {
    let session_id = jar.get(SESSION_COOKIE)?.value().to_string();
    let session = state.sessions.get(&session_id).await?;
    Some((session_id, session))
}

fn no_active_session() -> AppError {
    AppError::BadRequest("No active chat session. Please start a new chat.".to_string())
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Strict);
    cookie
}

// ============================================================
// Literacy guide
// ============================================================

async fn literacy_home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Digital Literacy Guide - Coming Soon!".to_string(),
    })
}

async fn literacy_platforms() -> Json<PlatformsResponse> {
    Json(PlatformsResponse {
        platforms: LITERACY_PLATFORMS.iter().map(ToString::to_string).collect(),
    })
}

// ============================================================
// Health
// ============================================================

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Re-probe the source rather than trusting the startup cache, so the
    // probe notices a file that has gone missing underneath a running
    // process.
    let scenarios_loaded = store::try_load(&state.scenarios_path).is_ok();

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        data_files: DataFilesStatus {
            scenarios: scenarios_loaded,
            literacy: true,
        },
        active_sessions: state.sessions.active_count().await,
    })
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

// ============================================================
// Errors
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

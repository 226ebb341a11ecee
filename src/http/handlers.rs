use super::state::{AppState, SessionEntry};
use crate::capture::IngestCaptureDevice;
use crate::session::{LiveSession, SessionConfig, SessionError, SessionStatus, UserContext};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Event the session belongs to; sessions without one are never persisted
    pub event_id: Option<String>,

    pub user_id: Option<String>,

    pub display_name: Option<String>,

    /// Seed for the simulated viewer counter (mainly for tests)
    pub viewer_seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct GoLiveRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IngestChunkRequest {
    /// Base64-encoded chunk bytes
    pub data: String,
    /// Milliseconds since capture started
    pub timestamp_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct IngestChunkResponse {
    pub accepted: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Helpers
// ============================================================================

async fn lookup(state: &AppState, session_id: &str) -> Option<SessionEntry> {
    state.sessions.read().await.get(session_id).cloned()
}

fn not_found(session_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

fn session_error(e: SessionError) -> Response {
    let status = match &e {
        SessionError::TitleRequired => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::InvalidTransition { .. } | SessionError::Recorder(_) => StatusCode::CONFLICT,
        SessionError::Capture(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions
/// Create a new session in `setup`
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    let session_id = format!("live-{}", uuid::Uuid::new_v4());

    let config = SessionConfig {
        session_id: session_id.clone(),
        event_id: req.event_id,
        user: UserContext::new(
            req.user_id.unwrap_or_else(|| "anonymous".to_string()),
            req.display_name,
        ),
        constraints: state.defaults.constraints.clone(),
        recorder: state.defaults.recorder.clone(),
        viewer_seed: req
            .viewer_seed
            .unwrap_or_else(|| uuid::Uuid::new_v4().as_u128() as u64),
    };

    let (device, ingest) = IngestCaptureDevice::new();
    let session = Arc::new(LiveSession::new(
        config,
        Box::new(device),
        Arc::clone(&state.services),
    ));

    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), SessionEntry { session, ingest });

    info!("Created session {}", session_id);

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            status: "setup".to_string(),
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/preview
pub async fn start_preview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.session.start_preview().await {
        Ok(()) => (StatusCode::OK, Json(entry.session.stats().await)).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /sessions/:session_id/preview/cancel
pub async fn cancel_preview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.session.cancel_preview().await {
        Ok(()) => (StatusCode::OK, Json(entry.session.stats().await)).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /sessions/:session_id/live
pub async fn go_live(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<GoLiveRequest>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    entry.session.set_title(req.title).await;
    if let Some(description) = req.description {
        entry.session.set_description(description).await;
    }

    match entry.session.go_live().await {
        Ok(()) => (StatusCode::OK, Json(entry.session.stats().await)).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /sessions/:session_id/chunks
/// Push one captured chunk into the session
pub async fn ingest_chunk(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<IngestChunkRequest>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    if entry.session.status().await != SessionStatus::Live {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Session {} is not live", session_id),
            }),
        )
            .into_response();
    }

    let data = match base64::engine::general_purpose::STANDARD.decode(&req.data) {
        Ok(data) => data,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid chunk encoding: {}", e),
                }),
            )
                .into_response();
        }
    };

    match entry.ingest.push(data, req.timestamp_ms).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(IngestChunkResponse { accepted: true }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /sessions/:session_id/chat
pub async fn post_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.session.send_chat(&req.content).await {
        Some(message) => (StatusCode::CREATED, Json(message)).into_response(),
        // Blank input is dropped without complaint
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /sessions/:session_id/chat
pub async fn list_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    (StatusCode::OK, Json(entry.session.chat_messages().await)).into_response()
}

/// GET /sessions/:session_id/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    (StatusCode::OK, Json(entry.session.stats().await)).into_response()
}

/// POST /sessions/:session_id/end
/// End the live stream and run the upload pipeline
pub async fn end_stream(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = lookup(&state, &session_id).await else {
        return not_found(&session_id);
    };

    match entry.session.end_stream().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => session_error(e),
    }
}

/// DELETE /sessions/:session_id
/// Close the session and drop all of its local state
pub async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let entry = state.sessions.write().await.remove(&session_id);

    match entry {
        Some(entry) => {
            entry.session.close().await;
            info!("Closed session {}", session_id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /recordings
pub async fn list_recordings(State(state): State<AppState>) -> impl IntoResponse {
    match state.services.recordings.list().await {
        Ok(recordings) => (StatusCode::OK, Json(recordings)).into_response(),
        Err(e) => {
            error!("Failed to list recordings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list recordings: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

//! HTTP API server for session control and chunk ingest
//!
//! This module provides a REST API for driving live sessions:
//! - POST /sessions - Create a session
//! - POST /sessions/:id/preview - Acquire the capture stream
//! - POST /sessions/:id/preview/cancel - Release it
//! - POST /sessions/:id/live - Go live (title required)
//! - POST /sessions/:id/chunks - Push a captured chunk (base64)
//! - POST /sessions/:id/chat, GET /sessions/:id/chat - Session chat
//! - POST /sessions/:id/end - End the stream and upload
//! - DELETE /sessions/:id - Close and reset
//! - GET /sessions/:id/status - Session snapshot
//! - GET /recordings - Persisted recordings
//! - GET /media/* - Stored clips
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, SessionDefaults, SessionEntry};

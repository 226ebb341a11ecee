use crate::capture::{CaptureConstraints, IngestHandle, RecorderConfig};
use crate::services::Services;
use crate::session::LiveSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-session handles held by the HTTP layer.
#[derive(Clone)]
pub struct SessionEntry {
    pub session: Arc<LiveSession>,
    pub ingest: IngestHandle,
}

/// Defaults applied to every session created over the API.
#[derive(Clone, Default)]
pub struct SessionDefaults {
    pub constraints: CaptureConstraints,
    pub recorder: RecorderConfig,
}

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active sessions (session_id → entry)
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,

    pub services: Arc<Services>,

    pub defaults: SessionDefaults,
}

impl AppState {
    pub fn new(services: Arc<Services>, defaults: SessionDefaults) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            services,
            defaults,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a live session.
///
/// ```text
/// setup -> preview -> live -> uploading -> ended
/// ```
/// `setup` is also the state after a failed preview, a cancelled preview,
/// and a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Setup,
    Preview,
    Live,
    Uploading,
    Ended,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Setup => write!(f, "setup"),
            SessionStatus::Preview => write!(f, "preview"),
            SessionStatus::Live => write!(f, "live"),
            SessionStatus::Uploading => write!(f, "uploading"),
            SessionStatus::Ended => write!(f, "ended"),
        }
    }
}

/// Snapshot of a session's current state.
///
/// `viewer_count` is a simulated figure, not a measured audience; no
/// viewer tracking exists in this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub status: SessionStatus,
    pub title: String,
    pub description: String,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: u64,
    pub viewer_count: u64,
    pub chunks_buffered: usize,
    pub chat_messages: usize,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a persisted recording.
///
/// Rows are created as `processing`; the transcription worker flips them
/// to `ready` or `failed` later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    Processing,
    Ready,
    Failed,
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingStatus::Processing => write!(f, "processing"),
            RecordingStatus::Ready => write!(f, "ready"),
            RecordingStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A persisted recording, created once per completed event-scoped session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,

    /// Event this recording belongs to
    pub event_id: String,

    /// Public URL of the stored clip
    pub recording_url: String,

    /// Duration of the live session in seconds
    pub duration_seconds: u64,

    /// Size of the stored clip in bytes
    pub file_size_bytes: u64,

    /// Current processing status
    pub status: RecordingStatus,

    /// User that hosted the session
    pub created_by: String,

    pub created_at: DateTime<Utc>,
}

/// Fields supplied when registering a freshly uploaded recording.
#[derive(Debug, Clone)]
pub struct NewRecording {
    pub event_id: String,
    pub recording_url: String,
    pub duration_seconds: u64,
    pub file_size_bytes: u64,
    pub created_by: String,
}

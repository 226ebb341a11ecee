use serde::{Deserialize, Serialize};

/// Job request published when a recording is ready for transcription
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionJobMessage {
    pub recording_id: String,
    pub recording_url: String,
    pub requested_at: String, // RFC3339 timestamp
}

/// Result published by the transcription worker
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionResultMessage {
    pub recording_id: String,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: String,
}

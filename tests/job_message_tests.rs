use livecast::services::{TranscriptionJobMessage, TranscriptionResultMessage};

#[test]
fn test_job_message_serialization() {
    let msg = TranscriptionJobMessage {
        recording_id: "rec-1234".to_string(),
        recording_url: "http://localhost:8090/media/live/u/e/1.webm".to_string(),
        requested_at: "2026-08-06T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("rec-1234"));
    assert!(json.contains("1.webm"));

    let deserialized: TranscriptionJobMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.recording_id, "rec-1234");
    assert_eq!(deserialized.requested_at, "2026-08-06T14:30:00Z");
}

#[test]
fn test_result_message_success() {
    let json = r#"{
        "recording_id": "rec-1234",
        "success": true,
        "error": null,
        "timestamp": "2026-08-06T14:35:00Z"
    }"#;

    let msg: TranscriptionResultMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.recording_id, "rec-1234");
    assert!(msg.success);
    assert!(msg.error.is_none());
}

#[test]
fn test_result_message_failure_carries_error() {
    let json = r#"{
        "recording_id": "rec-5678",
        "success": false,
        "error": "no speech detected",
        "timestamp": "2026-08-06T14:35:00Z"
    }"#;

    let msg: TranscriptionResultMessage = serde_json::from_str(json).unwrap();
    assert!(!msg.success);
    assert_eq!(msg.error.as_deref(), Some("no speech detected"));
}

// Integration tests for the filesystem-backed stores

use anyhow::Result;
use livecast::services::{
    FileRecordingStore, FsObjectStore, NewRecording, ObjectStore, RecordingStatus, RecordingStore,
};
use tempfile::TempDir;

fn new_recording(event_id: &str) -> NewRecording {
    NewRecording {
        event_id: event_id.to_string(),
        recording_url: format!("http://localhost:8090/media/live/u/{}/1.webm", event_id),
        duration_seconds: 42,
        file_size_bytes: 1024,
        created_by: "user-1".to_string(),
    }
}

#[tokio::test]
async fn test_object_store_roundtrip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FsObjectStore::new(temp_dir.path(), "http://localhost:8090/media");

    let data = vec![7u8; 2048];
    store
        .put("live/user-1/event-9/123.webm", &data, "video/webm")
        .await?;

    let stored = temp_dir.path().join("live/user-1/event-9/123.webm");
    assert!(stored.exists(), "blob should land under the storage root");
    assert_eq!(std::fs::read(&stored)?, data);

    Ok(())
}

#[tokio::test]
async fn test_object_store_public_url_joins_cleanly() -> Result<()> {
    let temp_dir = TempDir::new()?;

    // Trailing slash on the base must not double up
    let store = FsObjectStore::new(temp_dir.path(), "http://localhost:8090/media/");
    assert_eq!(
        store.public_url("live/u/e/1.webm"),
        "http://localhost:8090/media/live/u/e/1.webm"
    );

    Ok(())
}

#[tokio::test]
async fn test_recording_store_insert_and_get() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileRecordingStore::new(temp_dir.path());

    let recording = store.insert(new_recording("event-9")).await?;

    assert!(recording.id.starts_with("rec-"));
    assert_eq!(recording.status, RecordingStatus::Processing);
    assert_eq!(recording.duration_seconds, 42);

    let fetched = store.get(&recording.id).await?.expect("stored recording");
    assert_eq!(fetched.id, recording.id);
    assert_eq!(fetched.event_id, "event-9");

    Ok(())
}

#[tokio::test]
async fn test_recording_store_get_unknown_is_none() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileRecordingStore::new(temp_dir.path());

    assert!(store.get("rec-does-not-exist").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_recording_store_status_update_persists() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileRecordingStore::new(temp_dir.path());

    let recording = store.insert(new_recording("event-9")).await?;
    store
        .set_status(&recording.id, RecordingStatus::Ready)
        .await?;

    // Re-open the store to prove the change hit disk
    let reopened = FileRecordingStore::new(temp_dir.path());
    let fetched = reopened.get(&recording.id).await?.expect("stored recording");
    assert_eq!(fetched.status, RecordingStatus::Ready);

    Ok(())
}

#[tokio::test]
async fn test_recording_store_set_status_unknown_errors() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileRecordingStore::new(temp_dir.path());

    let result = store.set_status("rec-missing", RecordingStatus::Ready).await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_recording_store_lists_in_creation_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileRecordingStore::new(temp_dir.path());

    let first = store.insert(new_recording("event-1")).await?;
    let second = store.insert(new_recording("event-2")).await?;

    let listed = store.list().await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);

    Ok(())
}

#[tokio::test]
async fn test_recording_store_list_without_directory_is_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = FileRecordingStore::new(temp_dir.path().join("never-created"));

    assert!(store.list().await?.is_empty());

    Ok(())
}

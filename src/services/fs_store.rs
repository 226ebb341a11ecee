use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::records::{NewRecording, Recording, RecordingStatus};
use super::{ObjectStore, RecordingStore};

/// Object store backed by a local directory.
///
/// Blobs land under `root/<path>` and are served back by the HTTP layer
/// under `public_base_url/<path>`.
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, path: &str, data: &[u8], content_type: &str) -> Result<()> {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create object directory")?;
        }

        tokio::fs::write(&full_path, data)
            .await
            .with_context(|| format!("Failed to write object: {:?}", full_path))?;

        info!(
            "Stored object {} ({} bytes, {})",
            path,
            data.len(),
            content_type
        );

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), path)
    }
}

/// Recording store that keeps one JSON document per recording.
pub struct FileRecordingStore {
    root: PathBuf,
}

impl FileRecordingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    async fn write_record(&self, recording: &Recording) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .context("Failed to create recordings directory")?;

        let json = serde_json::to_vec_pretty(recording)
            .context("Failed to serialize recording")?;

        tokio::fs::write(self.record_path(&recording.id), json)
            .await
            .with_context(|| format!("Failed to write recording {}", recording.id))?;

        Ok(())
    }

    async fn read_record(&self, path: &Path) -> Result<Recording> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read recording: {:?}", path))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse recording: {:?}", path))
    }
}

#[async_trait::async_trait]
impl RecordingStore for FileRecordingStore {
    async fn insert(&self, new: NewRecording) -> Result<Recording> {
        let recording = Recording {
            id: format!("rec-{}", uuid::Uuid::new_v4()),
            event_id: new.event_id,
            recording_url: new.recording_url,
            duration_seconds: new.duration_seconds,
            file_size_bytes: new.file_size_bytes,
            status: RecordingStatus::Processing,
            created_by: new.created_by,
            created_at: Utc::now(),
        };

        self.write_record(&recording).await?;
        info!("Registered recording {} for event {}", recording.id, recording.event_id);

        Ok(recording)
    }

    async fn get(&self, id: &str) -> Result<Option<Recording>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.read_record(&path).await?))
    }

    async fn set_status(&self, id: &str, status: RecordingStatus) -> Result<()> {
        let mut recording = self
            .get(id)
            .await?
            .with_context(|| format!("Recording {} not found", id))?;

        recording.status = status;
        self.write_record(&recording).await?;
        info!("Recording {} is now {}", id, status);

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Recording>> {
        let mut recordings = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(recordings),
            Err(e) => return Err(e).context("Failed to read recordings directory"),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read_record(&path).await {
                Ok(recording) => recordings.push(recording),
                Err(e) => warn!("Skipping unreadable recording {:?}: {}", path, e),
            }
        }

        recordings.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(recordings)
    }
}

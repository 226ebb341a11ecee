use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::records::{NewRecording, Recording, RecordingStatus};
use super::{JobDispatcher, Notice, NoticeLevel, Notifier, ObjectStore, RecordingStore};

/// In-memory object store for tests and service-free development.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, path: &str, data: &[u8], _content_type: &str) -> Result<()> {
        self.objects
            .write()
            .await
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{}", path)
    }
}

/// In-memory recording store.
#[derive(Default)]
pub struct MemoryRecordingStore {
    recordings: RwLock<Vec<Recording>>,
}

impl MemoryRecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Recording> {
        self.recordings.read().await.clone()
    }
}

#[async_trait::async_trait]
impl RecordingStore for MemoryRecordingStore {
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
        self.recordings.write().await.push(recording.clone());
        Ok(recording)
    }

    async fn get(&self, id: &str) -> Result<Option<Recording>> {
        Ok(self
            .recordings
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn set_status(&self, id: &str, status: RecordingStatus) -> Result<()> {
        let mut recordings = self.recordings.write().await;
        let recording = recordings
            .iter_mut()
            .find(|r| r.id == id)
            .with_context(|| format!("Recording {} not found", id))?;
        recording.status = status;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Recording>> {
        Ok(self.recordings.read().await.clone())
    }
}

/// Dispatcher that only logs, used when job dispatch is disabled.
#[derive(Default)]
pub struct LogJobDispatcher {
    dispatched: AtomicUsize,
}

impl LogJobDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl JobDispatcher for LogJobDispatcher {
    async fn dispatch_transcription(&self, recording: &Recording) -> Result<()> {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        info!(
            "Transcription dispatch disabled, skipping job for recording {}",
            recording.id
        );
        Ok(())
    }
}

/// Notifier that routes notices to the log.
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!("[notice] {}", notice.message),
            _ => info!("[notice] {}", notice.message),
        }
    }
}

/// Notifier that collects notices for inspection in tests.
#[derive(Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices lock poisoned").clone()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .collect()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .expect("notices lock poisoned")
            .push(notice);
    }
}

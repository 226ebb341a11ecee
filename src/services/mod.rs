//! External service seams
//!
//! The session pipeline talks to its collaborators through these traits:
//! - `ObjectStore`: blob storage for assembled clips
//! - `RecordingStore`: the recordings table
//! - `JobDispatcher`: fire-and-forget transcription trigger
//! - `Notifier`: user-facing success/failure notices
//!
//! Production implementations live in `fs_store` (filesystem-backed
//! storage) and `nats` (NATS job dispatch); `memory` provides in-memory
//! backends for tests and for running without external services.

pub mod fs_store;
pub mod memory;
pub mod messages;
pub mod nats;
pub mod records;

pub use fs_store::{FileRecordingStore, FsObjectStore};
pub use memory::{
    CollectingNotifier, LogJobDispatcher, MemoryObjectStore, MemoryRecordingStore, TracingNotifier,
};
pub use messages::{TranscriptionJobMessage, TranscriptionResultMessage};
pub use nats::{NatsJobDispatcher, TranscriptionWatcher};
pub use records::{NewRecording, Recording, RecordingStatus};

use anyhow::Result;
use std::sync::Arc;

/// Object storage for assembled clips
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a blob under the given path
    async fn put(&self, path: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Public URL a stored path is reachable at
    fn public_url(&self, path: &str) -> String;
}

/// The recordings table
#[async_trait::async_trait]
pub trait RecordingStore: Send + Sync {
    async fn insert(&self, new: NewRecording) -> Result<Recording>;

    async fn get(&self, id: &str) -> Result<Option<Recording>>;

    async fn set_status(&self, id: &str, status: RecordingStatus) -> Result<()>;

    async fn list(&self) -> Result<Vec<Recording>>;
}

/// Fire-and-forget trigger for the asynchronous transcription job.
///
/// Nothing beyond dispatch acknowledgement is awaited; results come back
/// out-of-band (see `TranscriptionWatcher`).
#[async_trait::async_trait]
pub trait JobDispatcher: Send + Sync {
    async fn dispatch_transcription(&self, recording: &Recording) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A user-facing notice (the platform surfaces these as toasts).
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for user-facing notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Bundle of service handles a session needs.
#[derive(Clone)]
pub struct Services {
    pub objects: Arc<dyn ObjectStore>,
    pub recordings: Arc<dyn RecordingStore>,
    pub jobs: Arc<dyn JobDispatcher>,
    pub notifier: Arc<dyn Notifier>,
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use super::device::{CaptureConstraints, CaptureError, MediaCaptureDevice, MediaChunk};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("session has no active capture stream")]
    NotCapturing,
}

/// Producer-side handle for an [`IngestCaptureDevice`].
///
/// Held by the HTTP layer; each accepted chunk upload is pushed through
/// the handle into the session's chunk channel. Pushes are rejected once
/// capture has stopped.
#[derive(Clone)]
pub struct IngestHandle {
    sender: Arc<Mutex<Option<mpsc::Sender<MediaChunk>>>>,
    sequence: Arc<AtomicU64>,
}

impl IngestHandle {
    pub async fn push(&self, data: Vec<u8>, timestamp_ms: u64) -> Result<(), IngestError> {
        let guard = self.sender.lock().await;
        let tx = guard.as_ref().ok_or(IngestError::NotCapturing)?;
        let chunk = MediaChunk {
            data,
            timestamp_ms,
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
        };
        tx.send(chunk).await.map_err(|_| IngestError::NotCapturing)
    }
}

/// Capture device fed by a remote producer instead of local hardware.
///
/// The device owns the receiving end of the chunk channel; the paired
/// [`IngestHandle`] is the only way in. Stopping capture drops the sender,
/// which closes the channel and rejects further pushes.
pub struct IngestCaptureDevice {
    sender: Arc<Mutex<Option<mpsc::Sender<MediaChunk>>>>,
    sequence: Arc<AtomicU64>,
    capturing: bool,
}

impl IngestCaptureDevice {
    pub fn new() -> (Self, IngestHandle) {
        let sender = Arc::new(Mutex::new(None));
        let sequence = Arc::new(AtomicU64::new(0));
        let handle = IngestHandle {
            sender: Arc::clone(&sender),
            sequence: Arc::clone(&sequence),
        };
        (
            Self {
                sender,
                sequence,
                capturing: false,
            },
            handle,
        )
    }
}

#[async_trait::async_trait]
impl MediaCaptureDevice for IngestCaptureDevice {
    async fn start_capture(
        &mut self,
        constraints: &CaptureConstraints,
        _chunk_interval: Duration,
    ) -> Result<mpsc::Receiver<MediaChunk>, CaptureError> {
        if self.capturing {
            return Err(CaptureError::AlreadyCapturing);
        }

        info!(
            "Ingest capture opened: {}x{} (audio: {})",
            constraints.width, constraints.height, constraints.audio
        );

        let (tx, rx) = mpsc::channel(100);
        *self.sender.lock().await = Some(tx);
        self.sequence.store(0, Ordering::SeqCst);
        self.capturing = true;

        Ok(rx)
    }

    async fn stop_capture(&mut self) {
        let closed = self.sender.lock().await.take().is_some();
        if closed {
            info!("Ingest capture closed");
        }
        self.capturing = false;
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "ingest"
    }

    fn supports_mime_type(&self, mime_type: &str) -> bool {
        // Encoding happens producer-side; any webm container is accepted
        mime_type.starts_with("video/webm")
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::device::{MediaCaptureDevice, MediaChunk};

/// Preferred encoding for recorded clips.
pub const PREFERRED_MIME_TYPE: &str = "video/webm;codecs=vp9,opus";

/// Container type used when the device cannot encode the preferred type.
pub const FALLBACK_MIME_TYPE: &str = "video/webm";

/// Recorder configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Cadence at which the device is asked to emit chunks
    pub chunk_interval: Duration,
    /// Encoding requested first
    pub preferred_mime_type: String,
    /// Encoding used when the preferred type is unsupported
    pub fallback_mime_type: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            chunk_interval: Duration::from_secs(1),
            preferred_mime_type: PREFERRED_MIME_TYPE.to_string(),
            fallback_mime_type: FALLBACK_MIME_TYPE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("recording already in progress")]
    AlreadyRecording,
}

/// All buffered chunks concatenated into a single uploadable clip.
#[derive(Debug, Clone)]
pub struct AssembledClip {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub chunk_count: usize,
}

impl AssembledClip {
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Segmented recorder
///
/// Drains chunks from a capture device's channel into an in-memory,
/// append-only buffer. Chunks arrive and are kept in emission (FIFO)
/// order; empty chunks are dropped. Recording is single-session: a second
/// `start` while the drain task is live is rejected.
///
/// The drain task ends when the device closes the chunk channel, so
/// `finish` observes every chunk including the device's final flush.
pub struct SegmentedRecorder {
    config: RecorderConfig,
    chunks: Arc<Mutex<Vec<MediaChunk>>>,
    recording: Arc<AtomicBool>,
    mime_type: std::sync::Mutex<String>,
    drain_task: Mutex<Option<JoinHandle<()>>>,
}

impl SegmentedRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        let mime_type = config.preferred_mime_type.clone();
        Self {
            config,
            chunks: Arc::new(Mutex::new(Vec::new())),
            recording: Arc::new(AtomicBool::new(false)),
            mime_type: std::sync::Mutex::new(mime_type),
            drain_task: Mutex::new(None),
        }
    }

    pub fn chunk_interval(&self) -> Duration {
        self.config.chunk_interval
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Pick the encoding for this device.
    ///
    /// Falls back silently when the preferred type is unsupported; the
    /// fallback is assumed universally available and never errors.
    pub fn select_mime_type(&self, device: &dyn MediaCaptureDevice) -> String {
        if device.supports_mime_type(&self.config.preferred_mime_type) {
            self.config.preferred_mime_type.clone()
        } else {
            debug!(
                "Device '{}' does not support {}, using {}",
                device.name(),
                self.config.preferred_mime_type,
                self.config.fallback_mime_type
            );
            self.config.fallback_mime_type.clone()
        }
    }

    /// Start buffering chunks from the given channel
    pub async fn start(
        &self,
        mut chunk_rx: mpsc::Receiver<MediaChunk>,
        mime_type: String,
    ) -> Result<(), RecorderError> {
        if self.recording.swap(true, Ordering::SeqCst) {
            warn!("Recorder start rejected: already recording");
            return Err(RecorderError::AlreadyRecording);
        }

        info!("Recorder started ({})", mime_type);
        *self.mime_type.lock().expect("mime type lock poisoned") = mime_type;

        let chunks = Arc::clone(&self.chunks);
        let recording = Arc::clone(&self.recording);

        let drain_task = tokio::spawn(async move {
            let mut received = 0usize;
            while let Some(chunk) = chunk_rx.recv().await {
                if chunk.is_empty() {
                    continue;
                }
                received += 1;
                chunks.lock().await.push(chunk);
            }
            recording.store(false, Ordering::SeqCst);
            debug!("Recorder drain complete: {} chunks buffered", received);
        });

        *self.drain_task.lock().await = Some(drain_task);

        Ok(())
    }

    /// Wait for the drain task to flush every remaining chunk.
    ///
    /// The device must have stopped (closing the chunk channel) first,
    /// otherwise this waits until it does.
    pub async fn finish(&self) {
        let task = self.drain_task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Recorder drain task panicked: {}", e);
            }
        }
        self.recording.store(false, Ordering::SeqCst);
    }

    pub async fn chunk_count(&self) -> usize {
        self.chunks.lock().await.len()
    }

    pub async fn buffered_bytes(&self) -> u64 {
        self.chunks
            .lock()
            .await
            .iter()
            .map(|c| c.data.len() as u64)
            .sum()
    }

    /// Concatenate and drain the buffer into a single clip.
    ///
    /// Returns `None` when nothing was captured. The buffer is empty
    /// afterwards either way.
    pub async fn assemble(&self) -> Option<AssembledClip> {
        let chunks = std::mem::take(&mut *self.chunks.lock().await);
        if chunks.is_empty() {
            return None;
        }

        let chunk_count = chunks.len();
        let total_bytes: usize = chunks.iter().map(|c| c.data.len()).sum();
        let mut data = Vec::with_capacity(total_bytes);
        for chunk in chunks {
            data.extend_from_slice(&chunk.data);
        }

        let mime_type = self.mime_type.lock().expect("mime type lock poisoned").clone();

        info!(
            "Assembled clip: {} chunks, {} bytes ({})",
            chunk_count,
            data.len(),
            mime_type
        );

        Some(AssembledClip {
            data,
            mime_type,
            chunk_count,
        })
    }

    /// Drop any buffered chunks and forget the drain task
    pub async fn reset(&self) {
        if let Some(task) = self.drain_task.lock().await.take() {
            task.abort();
        }
        self.chunks.lock().await.clear();
        self.recording.store(false, Ordering::SeqCst);
    }
}

impl Default for SegmentedRecorder {
    fn default() -> Self {
        Self::new(RecorderConfig::default())
    }
}

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::device::{CaptureConstraints, CaptureError, MediaCaptureDevice, MediaChunk};

/// Scripted behavior for a [`FakeCaptureDevice`].
#[derive(Debug, Clone)]
pub struct FakeScript {
    /// Bytes per emitted chunk
    pub chunk_bytes: usize,
    /// Stop emitting after this many chunks (channel stays open until stop)
    pub max_chunks: Option<u64>,
    /// Size of the partial chunk flushed on stop (0 = no final flush)
    pub final_flush_bytes: usize,
    /// Simulate the user denying capture access
    pub deny_access: bool,
    /// Mime types this device claims to support
    pub supported_mime_types: Vec<String>,
}

impl Default for FakeScript {
    fn default() -> Self {
        Self {
            chunk_bytes: 4096,
            max_chunks: None,
            final_flush_bytes: 0,
            deny_access: false,
            supported_mime_types: vec![
                "video/webm;codecs=vp9,opus".to_string(),
                "video/webm".to_string(),
            ],
        }
    }
}

/// In-process capture device driven by a script instead of real hardware.
///
/// Emits chunks on a fixed cadence from a background task. Chunk payloads
/// are filled with the chunk's sequence number so ordering is observable
/// in the assembled clip.
pub struct FakeCaptureDevice {
    script: FakeScript,
    capturing: bool,
    stop_tx: Option<watch::Sender<bool>>,
    emit_task: Option<JoinHandle<()>>,
}

impl FakeCaptureDevice {
    pub fn new(script: FakeScript) -> Self {
        Self {
            script,
            capturing: false,
            stop_tx: None,
            emit_task: None,
        }
    }

    /// Device that immediately denies access, like a rejected permission prompt
    pub fn denied() -> Self {
        Self::new(FakeScript {
            deny_access: true,
            ..FakeScript::default()
        })
    }
}

#[async_trait::async_trait]
impl MediaCaptureDevice for FakeCaptureDevice {
    async fn start_capture(
        &mut self,
        constraints: &CaptureConstraints,
        chunk_interval: Duration,
    ) -> Result<mpsc::Receiver<MediaChunk>, CaptureError> {
        if self.script.deny_access {
            return Err(CaptureError::AccessDenied(
                "permission denied by user".to_string(),
            ));
        }
        if self.capturing {
            return Err(CaptureError::AlreadyCapturing);
        }

        info!(
            "Fake capture started: {}x{} (audio: {}), {}ms chunks",
            constraints.width,
            constraints.height,
            constraints.audio,
            chunk_interval.as_millis()
        );

        let (tx, rx) = mpsc::channel(100);
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let script = self.script.clone();
        let interval_ms = chunk_interval.as_millis() as u64;

        let emit_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(chunk_interval);
            // First tick completes immediately; chunks start one interval in
            interval.tick().await;

            let mut sequence: u64 = 0;
            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => {
                        if script.max_chunks.is_some_and(|max| sequence >= max) {
                            continue;
                        }
                        let chunk = MediaChunk {
                            data: vec![sequence as u8; script.chunk_bytes],
                            timestamp_ms: (sequence + 1) * interval_ms,
                            sequence,
                        };
                        if tx.send(chunk).await.is_err() {
                            warn!("Chunk receiver dropped, stopping fake capture");
                            return;
                        }
                        sequence += 1;
                    }
                }
            }

            // Flush a final partial chunk, like a real recorder does on stop
            if script.final_flush_bytes > 0 {
                let chunk = MediaChunk {
                    data: vec![sequence as u8; script.final_flush_bytes],
                    timestamp_ms: (sequence + 1) * interval_ms,
                    sequence,
                };
                let _ = tx.send(chunk).await;
            }
            // Sender drops here, closing the chunk channel
        });

        self.capturing = true;
        self.stop_tx = Some(stop_tx);
        self.emit_task = Some(emit_task);

        Ok(rx)
    }

    async fn stop_capture(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        if let Some(task) = self.emit_task.take() {
            if let Err(e) = task.await {
                warn!("Fake capture emit task panicked: {}", e);
            }
        }
        if self.capturing {
            info!("Fake capture stopped");
        }
        self.capturing = false;
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn supports_mime_type(&self, mime_type: &str) -> bool {
        self.script
            .supported_mime_types
            .iter()
            .any(|m| m == mime_type)
    }
}

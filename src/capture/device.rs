use std::time::Duration;
use tokio::sync::mpsc;

/// A single encoded media segment emitted by a capture device.
///
/// Chunks are opaque container bytes (webm); nothing downstream parses or
/// re-encodes them. They are buffered in emission order and concatenated
/// into one clip when the session ends.
#[derive(Debug, Clone)]
pub struct MediaChunk {
    /// Encoded container bytes for this segment
    pub data: Vec<u8>,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
    /// Emission sequence number (0-indexed)
    pub sequence: u64,
}

impl MediaChunk {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Requested capture parameters.
#[derive(Debug, Clone)]
pub struct CaptureConstraints {
    /// Requested video width in pixels
    pub width: u32,
    /// Requested video height in pixels
    pub height: u32,
    /// Whether to capture audio alongside video
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            audio: true,
        }
    }
}

/// Capture failure taxonomy.
///
/// All variants are recoverable: the session stays in `setup` and the
/// failure is surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture access denied: {0}")]
    AccessDenied(String),

    #[error("no capture device available")]
    NoDevice,

    #[error("device is already capturing")]
    AlreadyCapturing,
}

/// Media capture device trait
///
/// Implementations:
/// - `FakeCaptureDevice`: scripted in-process device (tests, local dev)
/// - `IngestCaptureDevice`: channel-fed device for remote producers
///   pushing chunks through the HTTP API
#[async_trait::async_trait]
pub trait MediaCaptureDevice: Send + Sync {
    /// Start capturing media
    ///
    /// Returns a channel receiver that will receive encoded chunks at
    /// roughly `chunk_interval` cadence. The channel closes after
    /// `stop_capture`, once any final partial chunk has been flushed.
    async fn start_capture(
        &mut self,
        constraints: &CaptureConstraints,
        chunk_interval: Duration,
    ) -> Result<mpsc::Receiver<MediaChunk>, CaptureError>;

    /// Stop capturing and release the underlying stream
    ///
    /// Must be safe to call on every exit path, including when capture
    /// was never started.
    async fn stop_capture(&mut self);

    /// Check if the device is currently capturing
    fn is_capturing(&self) -> bool;

    /// Device name for logging
    fn name(&self) -> &str;

    /// Whether the device can encode the given container/codec type
    fn supports_mime_type(&self, mime_type: &str) -> bool;
}

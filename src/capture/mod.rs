//! Media capture and segmented recording
//!
//! This module provides the capture seam for live sessions:
//! - `MediaCaptureDevice`: trait over chunk-emitting capture sources
//! - `FakeCaptureDevice`: scripted device for tests and local development
//! - `IngestCaptureDevice`: channel-fed device for remote producers
//! - `SegmentedRecorder`: FIFO chunk buffer with codec fallback

pub mod device;
pub mod fake;
pub mod ingest;
pub mod recorder;

pub use device::{CaptureConstraints, CaptureError, MediaCaptureDevice, MediaChunk};
pub use fake::{FakeCaptureDevice, FakeScript};
pub use ingest::{IngestCaptureDevice, IngestError, IngestHandle};
pub use recorder::{
    AssembledClip, RecorderConfig, RecorderError, SegmentedRecorder, FALLBACK_MIME_TYPE,
    PREFERRED_MIME_TYPE,
};

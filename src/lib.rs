pub mod capture;
pub mod config;
pub mod http;
pub mod services;
pub mod session;

pub use capture::{
    CaptureConstraints, CaptureError, FakeCaptureDevice, FakeScript, IngestCaptureDevice,
    IngestHandle, MediaCaptureDevice, MediaChunk, RecorderConfig, SegmentedRecorder,
};
pub use config::Config;
pub use http::{create_router, AppState, SessionDefaults};
pub use services::{
    JobDispatcher, Notifier, ObjectStore, Recording, RecordingStatus, RecordingStore, Services,
};
pub use session::{
    ChatMessage, LiveSession, SessionConfig, SessionError, SessionStats, SessionStatus,
    UserContext,
};

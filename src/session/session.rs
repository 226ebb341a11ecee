use super::chat::{ChatLog, ChatMessage};
use super::config::SessionConfig;
use super::simulate::ViewerSimulator;
use super::state::{SessionStats, SessionStatus};
use crate::capture::{CaptureError, MediaCaptureDevice, MediaChunk, RecorderError, SegmentedRecorder};
use crate::services::{NewRecording, Notice, Recording, Services};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error("a title is required to go live")]
    TitleRequired,

    #[error("cannot {action} while {status}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },
}

/// Upload pipeline failure, by step.
///
/// Any variant is surfaced to the user as a single upload-failure notice;
/// none of them block the terminal `ended` transition, and the footage is
/// discarded either way.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("storage upload failed: {0:#}")]
    Storage(#[source] anyhow::Error),

    #[error("recording registration failed: {0:#}")]
    Metadata(#[source] anyhow::Error),

    #[error("transcription dispatch failed: {0:#}")]
    Dispatch(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
struct SessionState {
    status: SessionStatus,
    title: String,
    description: String,
    started_at: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Setup,
            title: String::new(),
            description: String::new(),
            started_at: None,
        }
    }
}

/// A live session: capture preview, segmented recording, simulated live
/// counters, ephemeral chat, and the end-of-stream upload pipeline.
///
/// The capture stream and chunk buffer are owned exclusively by this
/// instance and never outlive it.
pub struct LiveSession {
    config: SessionConfig,

    services: Arc<Services>,

    /// Status plus the mutable setup fields, guarded together
    state: Mutex<SessionState>,

    /// Capture device held for the whole session lifetime
    device: Mutex<Box<dyn MediaCaptureDevice>>,

    /// Chunk channel handed over from preview to the recorder at go-live
    chunk_rx: Mutex<Option<mpsc::Receiver<MediaChunk>>>,

    recorder: SegmentedRecorder,

    chat: ChatLog,

    /// Seconds spent live, advanced by the ticker
    elapsed_seconds: Arc<AtomicU64>,

    /// Simulated audience size, advanced by the ticker
    viewer_count: Arc<AtomicU64>,

    /// Handle for the 1-second live ticker task
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl LiveSession {
    pub fn new(
        config: SessionConfig,
        device: Box<dyn MediaCaptureDevice>,
        services: Arc<Services>,
    ) -> Self {
        info!("Creating live session: {}", config.session_id);

        let recorder = SegmentedRecorder::new(config.recorder.clone());

        Self {
            config,
            services,
            state: Mutex::new(SessionState::default()),
            device: Mutex::new(device),
            chunk_rx: Mutex::new(None),
            recorder,
            chat: ChatLog::new(),
            elapsed_seconds: Arc::new(AtomicU64::new(0)),
            viewer_count: Arc::new(AtomicU64::new(0)),
            ticker: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    /// Whether the capture device currently holds a live stream
    pub async fn is_capturing(&self) -> bool {
        self.device.lock().await.is_capturing()
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.state.lock().await.title = title.into();
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.state.lock().await.description = description.into();
    }

    /// Acquire the capture stream and enter `preview`.
    ///
    /// On failure the session stays in `setup` and the error is surfaced
    /// as a notice.
    pub async fn start_preview(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.status != SessionStatus::Setup {
            return Err(SessionError::InvalidTransition {
                action: "start preview",
                status: state.status,
            });
        }

        let mut device = self.device.lock().await;
        match device
            .start_capture(&self.config.constraints, self.recorder.chunk_interval())
            .await
        {
            Ok(rx) => {
                *self.chunk_rx.lock().await = Some(rx);
                state.status = SessionStatus::Preview;
                info!("Session {} entered preview", self.config.session_id);
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Session {} failed to start preview: {}",
                    self.config.session_id, e
                );
                self.services
                    .notifier
                    .notify(Notice::error(format!("Camera unavailable: {}", e)));
                Err(e.into())
            }
        }
    }

    /// Release the capture stream and return to `setup`.
    pub async fn cancel_preview(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.status != SessionStatus::Preview {
            return Err(SessionError::InvalidTransition {
                action: "cancel preview",
                status: state.status,
            });
        }

        self.device.lock().await.stop_capture().await;
        self.chunk_rx.lock().await.take();
        self.recorder.reset().await;
        state.status = SessionStatus::Setup;

        info!("Session {} preview cancelled", self.config.session_id);

        Ok(())
    }

    /// Start recording and the live counters.
    ///
    /// Requires `preview` and a non-blank title; rejected with a
    /// validation notice otherwise, with no state transition.
    pub async fn go_live(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.status != SessionStatus::Preview {
            return Err(SessionError::InvalidTransition {
                action: "go live",
                status: state.status,
            });
        }

        if state.title.trim().is_empty() {
            self.services
                .notifier
                .notify(Notice::error("Add a title before going live"));
            return Err(SessionError::TitleRequired);
        }

        let chunk_rx = self.chunk_rx.lock().await.take();
        let Some(chunk_rx) = chunk_rx else {
            return Err(SessionError::InvalidTransition {
                action: "go live",
                status: state.status,
            });
        };

        let mime_type = {
            let device = self.device.lock().await;
            self.recorder.select_mime_type(device.as_ref())
        };

        self.recorder.start(chunk_rx, mime_type).await?;

        state.status = SessionStatus::Live;
        state.started_at = Some(Utc::now());
        drop(state);

        self.start_ticker().await;

        info!("Session {} is live", self.config.session_id);
        self.services
            .notifier
            .notify(Notice::success("You are now live"));

        Ok(())
    }

    /// Append a chat message; blank input is dropped.
    pub async fn send_chat(&self, content: &str) -> Option<ChatMessage> {
        self.chat
            .post(self.config.user.author_name(), content)
            .await
    }

    pub async fn chat_messages(&self) -> Vec<ChatMessage> {
        self.chat.list().await
    }

    /// End the live stream and run the upload pipeline.
    ///
    /// Always terminates in `ended`, upload success or failure alike.
    /// Sessions with no captured chunks or no associated event skip the
    /// upload entirely.
    pub async fn end_stream(&self) -> Result<SessionStats, SessionError> {
        {
            let mut state = self.state.lock().await;
            if state.status != SessionStatus::Live {
                return Err(SessionError::InvalidTransition {
                    action: "end stream",
                    status: state.status,
                });
            }

            self.stop_ticker().await;

            // Stopping the device flushes its final chunk and closes the
            // chunk channel
            self.device.lock().await.stop_capture().await;

            state.status = SessionStatus::Uploading;
        }

        // Wait for the drain task to land every flushed chunk
        self.recorder.finish().await;

        let elapsed = self.elapsed_seconds.load(Ordering::SeqCst);
        let clip = self.recorder.assemble().await;

        match (clip, self.config.event_id.as_deref()) {
            (Some(clip), Some(event_id)) => {
                match self.upload_clip(clip, event_id, elapsed).await {
                    Ok(recording) => {
                        info!(
                            "Session {} uploaded as recording {} ({}s, {} bytes)",
                            self.config.session_id,
                            recording.id,
                            recording.duration_seconds,
                            recording.file_size_bytes
                        );
                        self.services.notifier.notify(Notice::success(
                            "Stream ended, recording is processing",
                        ));
                    }
                    Err(e) => {
                        error!("Session {} upload failed: {}", self.config.session_id, e);
                        self.services.notifier.notify(Notice::error(
                            "Stream ended, but the recording could not be saved",
                        ));
                    }
                }
            }
            (None, _) => {
                info!(
                    "Session {} ended with no captured chunks, nothing to upload",
                    self.config.session_id
                );
            }
            (Some(_), None) => {
                info!(
                    "Session {} has no associated event, discarding footage",
                    self.config.session_id
                );
            }
        }

        let mut state = self.state.lock().await;
        // A concurrent close may have reset the session mid-upload; its
        // state wins
        if state.status == SessionStatus::Uploading {
            state.status = SessionStatus::Ended;
        }
        let stats = self.stats_with(&state).await;
        info!("Session {} ended", self.config.session_id);

        Ok(stats)
    }

    /// Upload pipeline: store blob, register the recording, dispatch the
    /// transcription job. Each step fails independently.
    async fn upload_clip(
        &self,
        clip: crate::capture::AssembledClip,
        event_id: &str,
        duration_seconds: u64,
    ) -> Result<Recording, UploadError> {
        let path = format!(
            "live/{}/{}/{}.webm",
            self.config.user.user_id,
            event_id,
            Utc::now().timestamp_millis()
        );

        self.services
            .objects
            .put(&path, &clip.data, &clip.mime_type)
            .await
            .context("object storage rejected the clip")
            .map_err(UploadError::Storage)?;

        let recording_url = self.services.objects.public_url(&path);

        let recording = self
            .services
            .recordings
            .insert(NewRecording {
                event_id: event_id.to_string(),
                recording_url,
                duration_seconds,
                file_size_bytes: clip.size_bytes(),
                created_by: self.config.user.user_id.clone(),
            })
            .await
            .context("failed to register the recording")
            .map_err(UploadError::Metadata)?;

        self.services
            .jobs
            .dispatch_transcription(&recording)
            .await
            .context("failed to dispatch transcription")
            .map_err(UploadError::Dispatch)?;

        Ok(recording)
    }

    /// Stop everything and reset to initial `setup` values.
    ///
    /// Safe to call at any status; an upload already in flight keeps
    /// running in its `end_stream` caller and is not aborted.
    pub async fn close(&self) {
        self.stop_ticker().await;
        self.device.lock().await.stop_capture().await;
        self.chunk_rx.lock().await.take();
        self.recorder.reset().await;
        self.chat.clear().await;
        self.elapsed_seconds.store(0, Ordering::SeqCst);
        self.viewer_count.store(0, Ordering::SeqCst);
        *self.state.lock().await = SessionState::default();

        info!("Session {} closed", self.config.session_id);
    }

    pub async fn stats(&self) -> SessionStats {
        let state = self.state.lock().await;
        self.stats_with(&state).await
    }

    async fn stats_with(&self, state: &SessionState) -> SessionStats {
        SessionStats {
            session_id: self.config.session_id.clone(),
            status: state.status,
            title: state.title.clone(),
            description: state.description.clone(),
            started_at: state.started_at,
            elapsed_seconds: self.elapsed_seconds.load(Ordering::SeqCst),
            viewer_count: self.viewer_count.load(Ordering::SeqCst),
            chunks_buffered: self.recorder.chunk_count().await,
            chat_messages: self.chat.len().await,
        }
    }

    /// Spawn the 1-second live ticker: elapsed time plus the simulated
    /// viewer counter
    async fn start_ticker(&self) {
        let elapsed = Arc::clone(&self.elapsed_seconds);
        let viewers = Arc::clone(&self.viewer_count);
        let mut simulator = ViewerSimulator::new(self.config.viewer_seed);

        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // First tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                elapsed.fetch_add(1, Ordering::SeqCst);
                let current = viewers.load(Ordering::SeqCst);
                viewers.store(simulator.step(current), Ordering::SeqCst);
            }
        });

        *self.ticker.lock().await = Some(ticker);
    }

    /// Cancel the live ticker; must run on every transition away from
    /// `live`
    async fn stop_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.abort();
        }
    }
}

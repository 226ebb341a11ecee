use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::messages::{TranscriptionJobMessage, TranscriptionResultMessage};
use super::records::RecordingStatus;
use super::{JobDispatcher, Recording, RecordingStore};

/// Dispatches transcription jobs over NATS.
pub struct NatsJobDispatcher {
    client: Client,
    subject_prefix: String,
}

impl NatsJobDispatcher {
    /// Connect to the NATS server
    pub async fn connect(url: &str, subject_prefix: impl Into<String>) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject_prefix: subject_prefix.into(),
        })
    }
}

#[async_trait::async_trait]
impl JobDispatcher for NatsJobDispatcher {
    async fn dispatch_transcription(&self, recording: &Recording) -> Result<()> {
        let subject = format!("{}.transcribe.request", self.subject_prefix);

        let message = TranscriptionJobMessage {
            recording_id: recording.id.clone(),
            recording_url: recording.recording_url.clone(),
            requested_at: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish transcription job")?;

        info!(
            "Dispatched transcription job to {} (recording={})",
            subject, recording.id
        );

        Ok(())
    }
}

/// Listens for transcription results and updates recording status.
///
/// The transcription worker publishes a result message per finished job;
/// nothing in the session pipeline waits on it.
pub struct TranscriptionWatcher {
    client: Client,
    subject_prefix: String,
    recordings: Arc<dyn RecordingStore>,
}

impl TranscriptionWatcher {
    pub async fn connect(
        url: &str,
        subject_prefix: impl Into<String>,
        recordings: Arc<dyn RecordingStore>,
    ) -> Result<Self> {
        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        Ok(Self {
            client,
            subject_prefix: subject_prefix.into(),
            recordings,
        })
    }

    /// Spawn the watch task
    pub async fn spawn(self) -> Result<JoinHandle<()>> {
        let subject = format!("{}.transcribe.result", self.subject_prefix);

        info!("Subscribing to transcription results on {}", subject);

        let mut subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to transcription results")?;

        let recordings = self.recordings;

        let task = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let result = match serde_json::from_slice::<TranscriptionResultMessage>(&msg.payload)
                {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Failed to parse transcription result: {}", e);
                        continue;
                    }
                };

                let status = if result.success {
                    RecordingStatus::Ready
                } else {
                    warn!(
                        "Transcription failed for recording {}: {}",
                        result.recording_id,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                    RecordingStatus::Failed
                };

                if let Err(e) = recordings.set_status(&result.recording_id, status).await {
                    warn!(
                        "Failed to update recording {}: {}",
                        result.recording_id, e
                    );
                }
            }

            info!("Transcription result stream closed");
        });

        Ok(task)
    }
}

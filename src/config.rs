use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::capture::{CaptureConstraints, RecorderConfig};
use crate::http::SessionDefaults;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub capture: CaptureConfig,
    pub jobs: JobsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory assembled clips are stored under
    pub media_root: String,
    /// Base URL stored clips are served back from
    pub public_base_url: String,
    /// Directory recording documents are stored under
    pub recordings_root: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    pub chunk_interval_ms: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct JobsConfig {
    /// When false, transcription jobs are logged instead of dispatched
    pub enabled: bool,
    pub nats_url: String,
    pub subject_prefix: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session defaults derived from the capture section
    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            constraints: CaptureConstraints {
                width: self.capture.width,
                height: self.capture.height,
                audio: true,
            },
            recorder: RecorderConfig {
                chunk_interval: Duration::from_millis(self.capture.chunk_interval_ms),
                ..RecorderConfig::default()
            },
        }
    }
}

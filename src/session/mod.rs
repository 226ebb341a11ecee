//! Live session management
//!
//! This module provides the `LiveSession` abstraction that manages:
//! - Capture preview and stream lifecycle
//! - Segmented recording while live
//! - Simulated live counters (elapsed time, viewer figure)
//! - The end-of-stream upload pipeline
//! - An ephemeral, session-local chat log

mod chat;
mod config;
mod session;
mod simulate;
mod state;

pub use chat::{ChatLog, ChatMessage};
pub use config::{SessionConfig, UserContext};
pub use session::{LiveSession, SessionError, UploadError};
pub use simulate::ViewerSimulator;
pub use state::{SessionStats, SessionStatus};

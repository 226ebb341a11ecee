use crate::capture::{CaptureConstraints, RecorderConfig};

/// Identity of the user hosting a session.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub display_name: Option<String>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name,
        }
    }

    /// Name shown on chat messages, falling back to a placeholder
    pub fn author_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Anonymous")
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            display_name: None,
        }
    }
}

/// Configuration for a live session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Event this session belongs to; sessions without an event are never
    /// persisted after ending
    pub event_id: Option<String>,

    /// Hosting user
    pub user: UserContext,

    /// Requested capture parameters
    pub constraints: CaptureConstraints,

    /// Recorder cadence and encoding preferences
    pub recorder: RecorderConfig,

    /// Seed for the simulated viewer counter (deterministic in tests)
    pub viewer_seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("live-{}", uuid::Uuid::new_v4()),
            event_id: None,
            user: UserContext::default(),
            constraints: CaptureConstraints::default(),
            recorder: RecorderConfig::default(),
            viewer_seed: 1,
        }
    }
}

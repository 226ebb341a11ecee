use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A single chat message, newest-last in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Ephemeral, session-local chat log.
///
/// This is a local echo only: messages are held in memory for the open
/// session, are not persisted, and are not delivered to anyone else
/// because no transport is attached. A realtime channel would plug in at
/// this seam. The log is lost when the session closes.
#[derive(Default)]
pub struct ChatLog {
    messages: Mutex<Vec<ChatMessage>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, ignoring blank/whitespace-only input.
    ///
    /// Returns the stored message, or `None` when the input was dropped.
    pub async fn post(&self, author: &str, content: &str) -> Option<ChatMessage> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let message = ChatMessage {
            id: Uuid::new_v4(),
            author: author.to_string(),
            content: content.to_string(),
            sent_at: Utc::now(),
        };

        self.messages.lock().await.push(message.clone());

        Some(message)
    }

    pub async fn list(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.messages.lock().await.clear();
    }
}

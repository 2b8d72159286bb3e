use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short-lived message for the user, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Per-user fan-out of notices to every open feed of that user.
///
/// Channels are created on first subscription and never removed, so a
/// receiver only observes `Closed` when the board itself is dropped.
pub struct NoticeBoard {
    channels: Mutex<HashMap<String, broadcast::Sender<Notice>>>,
    capacity: usize,
}

impl NoticeBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn subscribe(&self, user_id: &str) -> broadcast::Receiver<Notice> {
        self.channels
            .lock()
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Fire-and-forget: with nobody listening the notice is dropped.
    pub fn publish(&self, user_id: &str, notice: Notice) {
        let delivered = self
            .channels
            .lock()
            .get(user_id)
            .map(|sender| sender.send(notice.clone()).is_ok())
            .unwrap_or(false);

        if !delivered {
            tracing::debug!("no open feed for user {user_id}, dropping notice: {}", notice.text);
        }
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(16)
    }
}

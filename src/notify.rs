//! User-facing status notifications.
//!
//! DESIGN
//! ======
//! Notifications are one-way events. The controller emits one after each
//! outcome is known and never waits on delivery, so sinks must not block.

use std::time::Duration;

use tokio::sync::mpsc;

/// Display duration for every notification this crate emits.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Visual tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Green.
    Success,
    /// Orange.
    Warning,
    /// Red.
    Error,
}

impl Tone {
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "green",
            Self::Warning => "orange",
            Self::Error => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub tone: Tone,
    pub timeout: Duration,
}

impl Notification {
    #[must_use]
    pub fn new(title: impl Into<String>, tone: Tone) -> Self {
        Self { title: title.into(), description: None, tone, timeout: DEFAULT_TIMEOUT }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Receiver of user-facing status events. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or("");
        match notification.tone {
            Tone::Error => tracing::warn!(title = %notification.title, description, "notification"),
            Tone::Success | Tone::Warning => {
                tracing::info!(title = %notification.title, description, color = notification.tone.color(), "notification");
            }
        }
    }
}

/// Forwards notifications to an unbounded channel, e.g. a UI event loop.
///
/// Sends never block; if the receiver is gone the notification is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("notification receiver closed; dropping notification");
        }
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;

//! Fire-and-forget user notifications (toasts)

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default time a notification stays visible
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: NotificationSeverity,
    pub summary: String,
    pub detail: String,
    pub ttl: Duration,
}

impl Notification {
    pub fn info(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: NotificationSeverity::Info,
            summary: summary.into(),
            detail: detail.into(),
            ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    pub fn warn(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: NotificationSeverity::Warn,
            summary: summary.into(),
            detail: detail.into(),
            ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Receives notifications; no acknowledgment is expected
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that keeps every notification it receives
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock())
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: Notification) {
        self.received.lock().push(notification);
    }
}

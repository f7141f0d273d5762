//! Notification boundary.
//!
//! Every processed command produces exactly one [`Notification`]. Delivery
//! is fire-and-forget: the processor never waits for or inspects an
//! acknowledgement.

use std::sync::{Arc, Mutex, PoisonError};

use homestead_types::{Notification, Severity};

/// Receiver of outcome messages.
pub trait NotificationSink {
    /// Deliver one notification.
    fn notify(&mut self, notification: Notification);
}

/// Sink that writes each notification to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: Notification) {
        let Notification {
            command_id,
            message,
            severity,
        } = notification;
        match severity {
            Severity::Error => tracing::warn!(%command_id, %message, "Notification"),
            Severity::Success | Severity::Info => {
                tracing::info!(%command_id, %message, ?severity, "Notification");
            }
        }
    }
}

/// Sink that keeps every notification in memory.
///
/// Clones share the same buffer, so a test can keep one handle and give
/// the other to the processor.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of notifications received.
    pub fn len(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl<N: NotificationSink + ?Sized> NotificationSink for Box<N> {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

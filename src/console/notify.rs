//! Ready-made notification sinks and confirmation prompts

use crate::core::source::{
    ConfirmRequest, ConfirmationPrompt, Notification, NotificationLevel, NotificationSink,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Writes notifications to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(kind = ?notification.level, "{}", notification.message)
            }
            NotificationLevel::Error => tracing::warn!("{}", notification.message),
        }
    }
}

/// Keeps every notification it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take and clear the received notifications
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Answers every confirmation with a fixed decision
#[derive(Debug)]
pub struct AutoConfirm {
    answer: bool,
    asked: AtomicUsize,
}

impl AutoConfirm {
    pub fn accept() -> Self {
        Self {
            answer: true,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn decline() -> Self {
        Self {
            answer: false,
            asked: AtomicUsize::new(0),
        }
    }

    /// How many confirmations were requested
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationPrompt for AutoConfirm {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(title = %request.title, answer = self.answer, "Auto-answered confirmation");
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let sink = RecordingNotifier::new();
        sink.notify(Notification::success("saved"));
        sink.notify(Notification::error("boom"));

        assert_eq!(sink.notifications().len(), 2);
        assert_eq!(sink.last(), Some(Notification::error("boom")));
        assert_eq!(sink.take().len(), 2);
        assert!(sink.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_auto_confirm_counts() {
        let prompt = AutoConfirm::decline();
        let request = ConfirmRequest::new("Delete", "Delete SPRING?");

        assert!(!prompt.confirm(&request).await);
        assert!(!prompt.confirm(&request).await);
        assert_eq!(prompt.asked(), 2);
        assert!(AutoConfirm::accept().confirm(&request).await);
    }
}

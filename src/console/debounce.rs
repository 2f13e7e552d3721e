//! Trailing-edge debounce for search input

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lets only the last of a burst of values through.
///
/// Each call to [`settle`](Debouncer::settle) waits for the quiet period and
/// yields its value only if no newer value arrived in the meantime. Clones
/// share the same burst, so keystrokes handled on different tasks still
/// supersede each other.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the quiet period; `None` when superseded
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(value)
    }

    /// Drop whatever value is currently waiting
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

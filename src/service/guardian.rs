//! Guardian notification. Delivery is not implemented; notifications are
//! counted and logged so callers and tests can observe them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counting no-op notifier.
#[derive(Debug, Default)]
pub struct GuardianNotifier {
    sent: AtomicU64,
}

impl GuardianNotifier {
    /// Creates a notifier with a zero count.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one notification for a user whose BAC reached the red tier.
    pub fn notify(&self, user_id: Option<&str>, bac: f64) {
        let total = self.sent.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        tracing::info!(user_id = user_id.unwrap_or("-"), bac, total, "guardian notification");
    }

    /// Notifications recorded so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_notification() {
        let notifier = GuardianNotifier::new();
        assert_eq!(notifier.sent(), 0);
        notifier.notify(Some("u1"), 0.13);
        notifier.notify(None, 0.2);
        assert_eq!(notifier.sent(), 2);
    }
}

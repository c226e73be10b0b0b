//! Table change notification.
//!
//! A monotonically increasing version number stored in a `watch` channel.
//! Writers bump it after a commit; live queries hold a receiver and re-query
//! whenever it moves. Rapid bumps are conflated, which is fine because every
//! re-query reads the full current state.

use tokio::sync::watch;

#[derive(Debug)]
pub struct InvalidationTracker {
    version: watch::Sender<u64>,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self { version }
    }

    /// Records one committed change.
    pub fn notify(&self) {
        self.version
            .send_modify(|version| *version = version.wrapping_add(1));
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::InvalidationTracker;

    #[test]
    fn notify_without_subscribers_still_advances_version() {
        let tracker = InvalidationTracker::new();
        tracker.notify();
        tracker.notify();
        assert_eq!(tracker.version(), 2);
    }

    #[test]
    fn subscriber_sees_change_after_notify() {
        let tracker = InvalidationTracker::new();
        let mut receiver = tracker.subscribe();
        assert!(!receiver.has_changed().unwrap());

        tracker.notify();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), 1);
    }
}

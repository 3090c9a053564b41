//! Retry affordance tracking for a view

use super::engine::SyncEngine;
use super::update::ViewUpdate;

/// Tracks whether the view should currently offer a retry
///
/// Retry is offered after a `Failure` with `offer_retry` set, until the
/// next `RefreshStarted` or `Snapshot`, whatever its source. There is no retry limit: every
/// failure offers one more.
#[derive(Debug, Default, Clone)]
pub struct RetryController {
    offered: bool,
    last_failure_after_retry: bool,
    retries_issued: u32,
}

impl RetryController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed every update the view receives through here
    pub fn observe(&mut self, update: &ViewUpdate) {
        match update {
            ViewUpdate::Failure {
                offer_retry,
                after_retry,
                ..
            } => {
                self.offered = *offer_retry;
                self.last_failure_after_retry = *after_retry;
            }
            ViewUpdate::RefreshStarted | ViewUpdate::Snapshot { .. } => {
                self.offered = false;
            }
            ViewUpdate::RefreshFinished => {}
        }
    }

    /// Whether a retry can be issued right now
    pub fn is_offered(&self) -> bool {
        self.offered
    }

    /// Whether the most recent failure followed a user retry
    pub fn last_failure_after_retry(&self) -> bool {
        self.last_failure_after_retry
    }

    /// Number of retries issued through this controller
    pub fn retries_issued(&self) -> u32 {
        self.retries_issued
    }

    /// Ask the engine to retry, if a retry is offered
    ///
    /// Returns whether a retry was issued.
    pub fn retry(&mut self, engine: &SyncEngine) -> bool {
        self.retry_with(|| engine.retry())
    }

    /// Issue a retry through `issue`, if a retry is offered
    pub fn retry_with(&mut self, issue: impl FnOnce()) -> bool {
        if !self.offered {
            return false;
        }
        self.offered = false;
        self.retries_issued += 1;
        issue();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ErrorKind;
    use crate::sync::update::SnapshotSource;

    fn failure(after_retry: bool) -> ViewUpdate {
        ViewUpdate::Failure {
            kind: ErrorKind::Network,
            offer_retry: true,
            after_retry,
        }
    }

    #[test]
    fn test_not_offered_initially() {
        let mut controller = RetryController::new();
        assert!(!controller.is_offered());
        assert!(!controller.retry_with(|| panic!("must not retry")));
    }

    #[test]
    fn test_failure_offers_retry() {
        let mut controller = RetryController::new();
        controller.observe(&ViewUpdate::RefreshStarted);
        controller.observe(&ViewUpdate::RefreshFinished);
        controller.observe(&failure(false));

        assert!(controller.is_offered());
        assert!(!controller.last_failure_after_retry());
    }

    #[test]
    fn test_refresh_started_or_network_snapshot_withdraws_offer() {
        let mut controller = RetryController::new();
        controller.observe(&failure(false));
        controller.observe(&ViewUpdate::RefreshStarted);
        assert!(!controller.is_offered());

        controller.observe(&failure(false));
        controller.observe(&ViewUpdate::Snapshot {
            singers: vec![],
            source: SnapshotSource::Network,
        });
        assert!(!controller.is_offered());
    }

    #[test]
    fn test_cache_snapshot_withdraws_offer() {
        let mut controller = RetryController::new();
        controller.observe(&failure(false));
        controller.observe(&ViewUpdate::Snapshot {
            singers: vec![],
            source: SnapshotSource::Cache,
        });
        assert!(!controller.is_offered());
        assert!(!controller.retry_with(|| panic!("must not retry")));
    }

    #[test]
    fn test_retry_consumes_offer() {
        let mut controller = RetryController::new();
        controller.observe(&failure(false));

        let mut issued = 0;
        assert!(controller.retry_with(|| issued += 1));
        assert!(!controller.retry_with(|| issued += 1));
        assert_eq!(issued, 1);
        assert_eq!(controller.retries_issued(), 1);
    }

    #[test]
    fn test_no_retry_exhaustion() {
        let mut controller = RetryController::new();

        for _ in 0..5 {
            controller.observe(&failure(controller.retries_issued() > 0));
            assert!(controller.retry_with(|| {}));
        }

        assert_eq!(controller.retries_issued(), 5);
        assert!(controller.last_failure_after_retry());
    }
}

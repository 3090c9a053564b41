//! Updates delivered to the view, and the sink contract that receives them

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::models::Singer;
use crate::remote::ErrorKind;

/// Which producer a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// The local cache stream
    Cache,
    /// A completed network refresh
    Network,
}

/// Event delivered to an attached view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    /// Full replacement of the displayed list
    Snapshot {
        singers: Vec<Singer>,
        source: SnapshotSource,
    },
    /// A network fetch is in flight
    RefreshStarted,
    /// The network fetch completed; a `Snapshot` or `Failure` follows
    RefreshFinished,
    /// The network fetch failed
    Failure {
        kind: ErrorKind,
        /// Whether the view should offer a retry (always true today)
        offer_retry: bool,
        /// Whether the failed refresh was itself a user retry
        after_retry: bool,
    },
}

impl ViewUpdate {
    /// Whether this update ends a refresh (`Snapshot` from the network or `Failure`)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ViewUpdate::Snapshot {
                source: SnapshotSource::Network,
                ..
            } | ViewUpdate::Failure { .. }
        )
    }

    /// Whether this update originated from the cache stream
    pub fn is_from_cache(&self) -> bool {
        matches!(
            self,
            ViewUpdate::Snapshot {
                source: SnapshotSource::Cache,
                ..
            }
        )
    }
}

/// Consumer of view updates
///
/// Called from the engine task while the sink is attached. Implementations
/// that render elsewhere must hand the update off (see [`ChannelSink`]).
pub trait ViewSink: Send + Sync {
    fn on_update(&self, update: ViewUpdate);
}

impl<F> ViewSink for F
where
    F: Fn(ViewUpdate) + Send + Sync,
{
    fn on_update(&self, update: ViewUpdate) {
        self(update)
    }
}

/// Sink that forwards updates onto an mpsc channel
///
/// The UI loop owns the receiver and drains it on its own schedule.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ViewUpdate>,
}

impl ChannelSink {
    /// Create a sink and the receiver it feeds
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl ViewSink for ChannelSink {
    fn on_update(&self, update: ViewUpdate) {
        // Receiver gone means the view is being torn down
        let _ = self.tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_terminal_updates() {
        let network = ViewUpdate::Snapshot {
            singers: vec![],
            source: SnapshotSource::Network,
        };
        let cache = ViewUpdate::Snapshot {
            singers: vec![],
            source: SnapshotSource::Cache,
        };
        let failure = ViewUpdate::Failure {
            kind: ErrorKind::Network,
            offer_retry: true,
            after_retry: false,
        };

        assert!(network.is_terminal());
        assert!(failure.is_terminal());
        assert!(!cache.is_terminal());
        assert!(cache.is_from_cache());
        assert!(!ViewUpdate::RefreshFinished.is_terminal());
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let sink = move |update: ViewUpdate| recorder.lock().unwrap().push(update);

        sink.on_update(ViewUpdate::RefreshStarted);
        assert_eq!(*seen.lock().unwrap(), vec![ViewUpdate::RefreshStarted]);
    }

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        sink.on_update(ViewUpdate::RefreshStarted);
        sink.on_update(ViewUpdate::RefreshFinished);

        assert_eq!(rx.recv().await, Some(ViewUpdate::RefreshStarted));
        assert_eq!(rx.recv().await, Some(ViewUpdate::RefreshFinished));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.on_update(ViewUpdate::RefreshStarted);
    }
}

//! Sync engine
//!
//! Runs as a single tokio task. `attach`, `detach`, `refresh` and `retry`
//! enqueue commands and return immediately; cache snapshots and fetch
//! completions arrive on the same task, so session state and sink delivery
//! are only ever touched from one place.
//!
//! ## Lifecycle
//!
//! One engine per screen. Sinks come and go (a view being rebuilt) while the
//! engine, its cache subscription and any in-flight fetch stay alive.
//! Shutting the engine down, or dropping it, cancels both producers.
//!
//! ## Supersede
//!
//! Each refresh bumps the session generation and aborts the previous fetch
//! task. A completion carrying an older generation is dropped without any
//! side effect, even if the abort raced with it.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::SessionState;
use super::update::{SnapshotSource, ViewSink, ViewUpdate};
use crate::models::Singer;
use crate::remote::{FetchResult, RemoteSource};
use crate::storage::{CacheStore, SnapshotStream};

/// Commands sent to the engine task
enum EngineCommand {
    Attach(Arc<dyn ViewSink>),
    Detach,
    Refresh { from_retry: bool },
    Shutdown,
}

/// Fetch result tagged with the refresh that issued it
struct FetchOutcome {
    generation: u64,
    result: FetchResult<Vec<Singer>>,
}

/// Whatever woke the engine task
enum Wakeup {
    Command(Option<EngineCommand>),
    Fetched(FetchOutcome),
    Cached(Option<Vec<Singer>>),
}

/// Handle to a running sync engine
///
/// Must be created inside a tokio runtime.
pub struct SyncEngine {
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    session_rx: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SyncEngine {
    /// Spawn the engine task
    ///
    /// Nothing is read or fetched until the first `attach`.
    pub fn spawn(cache: Arc<dyn CacheStore>, remote: Arc<dyn RemoteSource>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (session_tx, session_rx) = watch::channel(SessionState::default());

        let engine = EngineTask {
            cache,
            remote,
            sink: None,
            state: SessionState::default(),
            cache_stream: None,
            fetch: None,
            outcome_tx,
            session_tx,
        };
        let task = tokio::spawn(engine.run(command_rx, outcome_rx));

        Self {
            command_tx,
            session_rx,
            task,
        }
    }

    /// Bind a view; replaces any sink already attached
    ///
    /// The first attach subscribes to the cache. Every attach starts a
    /// refresh.
    pub fn attach(&self, sink: Arc<dyn ViewSink>) {
        self.send(EngineCommand::Attach(sink));
    }

    /// Unbind the current view
    ///
    /// The cache subscription and any in-flight fetch keep running; their
    /// output is dropped until a sink is attached again.
    pub fn detach(&self) {
        self.send(EngineCommand::Detach);
    }

    /// Start a refresh, superseding any in-flight one
    pub fn refresh(&self) {
        self.send(EngineCommand::Refresh { from_retry: false });
    }

    /// Start a refresh on behalf of a user retry
    pub fn retry(&self) {
        self.send(EngineCommand::Refresh { from_retry: true });
    }

    /// Latest published session state
    pub fn session(&self) -> SessionState {
        *self.session_rx.borrow()
    }

    /// Watch session state transitions
    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.session_rx.clone()
    }

    /// Stop the engine and wait for it to release everything
    ///
    /// Cancels the cache subscription and any in-flight fetch.
    pub async fn shutdown(self) {
        let SyncEngine {
            command_tx, task, ..
        } = self;

        let _ = command_tx.send(EngineCommand::Shutdown);
        drop(command_tx);

        if let Err(e) = task.await {
            warn!("Sync engine task ended abnormally: {}", e);
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.command_tx.send(command).is_err() {
            warn!("Sync engine is no longer running; command dropped");
        }
    }
}

/// State owned by the engine task
struct EngineTask {
    cache: Arc<dyn CacheStore>,
    remote: Arc<dyn RemoteSource>,
    sink: Option<Arc<dyn ViewSink>>,
    state: SessionState,
    cache_stream: Option<SnapshotStream>,
    fetch: Option<JoinHandle<()>>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    session_tx: watch::Sender<SessionState>,
}

impl EngineTask {
    async fn run(
        mut self,
        mut command_rx: mpsc::UnboundedReceiver<EngineCommand>,
        mut outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    ) {
        debug!("Sync engine started");

        loop {
            let wakeup = tokio::select! {
                biased;

                cmd = command_rx.recv() => Wakeup::Command(cmd),
                Some(outcome) = outcome_rx.recv() => Wakeup::Fetched(outcome),
                snapshot = next_snapshot(&mut self.cache_stream) => Wakeup::Cached(snapshot),
            };

            match wakeup {
                Wakeup::Command(Some(EngineCommand::Shutdown)) | Wakeup::Command(None) => break,
                Wakeup::Command(Some(EngineCommand::Attach(sink))) => self.attach(sink),
                Wakeup::Command(Some(EngineCommand::Detach)) => self.detach(),
                Wakeup::Command(Some(EngineCommand::Refresh { from_retry })) => {
                    self.refresh(from_retry)
                }
                Wakeup::Fetched(outcome) => self.complete(outcome),
                Wakeup::Cached(Some(singers)) => self.cache_snapshot(singers),
                Wakeup::Cached(None) => {
                    debug!("Cache stream ended");
                    self.cache_stream = None;
                }
            }

            self.session_tx.send_replace(self.state);
        }

        self.teardown();
    }

    fn attach(&mut self, sink: Arc<dyn ViewSink>) {
        if self.sink.replace(sink).is_some() {
            debug!("Replacing attached view sink");
        }
        self.state.attached = true;

        if self.state.is_first_attach && !self.state.cache_subscribed {
            debug!("Subscribing to singer cache");
            self.cache_stream = Some(self.cache.read());
            self.state.cache_subscribed = true;
        }
        self.state.is_first_attach = false;

        self.refresh(false);
    }

    fn detach(&mut self) {
        if self.sink.take().is_some() {
            debug!("View sink detached");
        }
        self.state.attached = false;
    }

    fn refresh(&mut self, from_retry: bool) {
        if let Some(previous) = self.fetch.take() {
            debug!(
                "Superseding in-flight fetch (generation {})",
                self.state.generation
            );
            previous.abort();
        }

        let generation = self.state.begin_refresh(from_retry);
        info!("Refresh started (generation {}, retry={})", generation, from_retry);
        self.deliver(ViewUpdate::RefreshStarted);

        let fetch = self.remote.fetch();
        let outcome_tx = self.outcome_tx.clone();
        self.fetch = Some(tokio::spawn(async move {
            let result = fetch.await;
            let _ = outcome_tx.send(FetchOutcome { generation, result });
        }));
    }

    fn complete(&mut self, outcome: FetchOutcome) {
        if !self.state.is_current(outcome.generation) {
            debug!(
                "Discarding superseded fetch result (generation {})",
                outcome.generation
            );
            return;
        }

        self.fetch = None;
        self.state.network_in_flight = false;

        match outcome.result {
            Ok(singers) => {
                info!("Refresh succeeded with {} singers", singers.len());
                self.deliver(ViewUpdate::RefreshFinished);
                if self.sink.is_some() {
                    self.deliver(ViewUpdate::Snapshot {
                        singers: singers.clone(),
                        source: SnapshotSource::Network,
                    });
                }
                // Persist even when no view is attached
                self.cache.write(&singers);
                self.state.retry_pending = false;
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                self.deliver(ViewUpdate::RefreshFinished);
                self.deliver(ViewUpdate::Failure {
                    kind: e.kind(),
                    offer_retry: true,
                    after_retry: self.state.retry_pending,
                });
                self.state.retry_pending = false;
            }
        }
    }

    fn cache_snapshot(&mut self, singers: Vec<Singer>) {
        if self.sink.is_none() {
            debug!("Dropping cache snapshot of {} singers: no view attached", singers.len());
            return;
        }
        self.deliver(ViewUpdate::Snapshot {
            singers,
            source: SnapshotSource::Cache,
        });
    }

    fn deliver(&self, update: ViewUpdate) {
        if let Some(sink) = &self.sink {
            sink.on_update(update);
        }
    }

    fn teardown(mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        self.cache_stream = None;
        self.sink = None;
        self.state.network_in_flight = false;
        self.state.attached = false;
        self.session_tx.send_replace(self.state);
        info!("Sync engine stopped");
    }
}

/// Next cache snapshot, or never if there is no subscription
async fn next_snapshot(stream: &mut Option<SnapshotStream>) -> Option<Vec<Singer>> {
    match stream {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

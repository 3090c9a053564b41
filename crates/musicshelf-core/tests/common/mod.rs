//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use musicshelf_core::remote::FetchResult;
use musicshelf_core::storage::SnapshotStream;
use musicshelf_core::{
    CacheStore, FetchError, RemoteSource, SessionState, Singer, SqliteCache, ViewUpdate,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

/// Remote source whose fetches stay pending until the test resolves them
pub struct ScriptedRemote {
    pending: Mutex<Vec<Option<oneshot::Sender<FetchResult<Vec<Singer>>>>>>,
    issued: watch::Sender<usize>,
}

impl ScriptedRemote {
    pub fn new() -> Arc<Self> {
        let (issued, _) = watch::channel(0);
        Arc::new(Self {
            pending: Mutex::new(Vec::new()),
            issued,
        })
    }

    /// Number of fetches issued so far
    pub fn fetch_count(&self) -> usize {
        *self.issued.borrow()
    }

    /// Wait until at least `n` fetches have been issued
    pub async fn wait_for_fetches(&self, n: usize) {
        let mut rx = self.issued.subscribe();
        timeout(WAIT, async { rx.wait_for(|count| *count >= n).await.map(|_| ()) })
            .await
            .expect("timed out waiting for fetch")
            .expect("remote dropped");
    }

    /// Resolve fetch number `index` (0-based) successfully
    pub fn succeed(&self, index: usize, singers: Vec<Singer>) {
        self.resolve(index, Ok(singers));
    }

    /// Resolve fetch number `index` (0-based) with a network failure
    pub fn fail(&self, index: usize) {
        self.resolve(index, Err(FetchError::Other("connection refused".to_string())));
    }

    fn resolve(&self, index: usize, result: FetchResult<Vec<Singer>>) {
        let sender = self.pending.lock().unwrap()[index]
            .take()
            .expect("fetch already resolved");
        // The engine may have aborted a superseded fetch already
        let _ = sender.send(result);
    }
}

impl RemoteSource for ScriptedRemote {
    fn fetch(&self) -> BoxFuture<'static, FetchResult<Vec<Singer>>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push(Some(tx));
        self.issued.send_modify(|count| *count += 1);

        async move {
            rx.await
                .unwrap_or_else(|_| Err(FetchError::Other("fetch abandoned".to_string())))
        }
        .boxed()
    }
}

/// SQLite cache that records how it is used
pub struct RecordingCache {
    inner: SqliteCache,
    reads: AtomicUsize,
    writes: Mutex<Vec<Vec<Singer>>>,
    written: watch::Sender<usize>,
}

impl RecordingCache {
    pub fn new() -> Arc<Self> {
        Self::with_contents(&[])
    }

    pub fn with_contents(singers: &[Singer]) -> Arc<Self> {
        let inner = SqliteCache::open_in_memory().unwrap();
        inner.try_write(singers).unwrap();
        let (written, _) = watch::channel(0);
        Arc::new(Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
            written,
        })
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<Vec<Singer>> {
        self.writes.lock().unwrap().clone()
    }

    /// Another handle onto the same cache, bypassing the recording
    pub fn store(&self) -> SqliteCache {
        self.inner.clone()
    }

    pub fn contents(&self) -> Vec<Singer> {
        self.inner.load_all().unwrap()
    }

    /// Wait until at least `n` writes have happened
    pub async fn wait_for_writes(&self, n: usize) {
        let mut rx = self.written.subscribe();
        timeout(WAIT, async { rx.wait_for(|count| *count >= n).await.map(|_| ()) })
            .await
            .expect("timed out waiting for cache write")
            .expect("cache dropped");
    }
}

impl CacheStore for RecordingCache {
    fn read(&self) -> SnapshotStream {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read()
    }

    fn write(&self, singers: &[Singer]) {
        self.writes.lock().unwrap().push(singers.to_vec());
        self.inner.write(singers);
        self.written.send_modify(|count| *count += 1);
    }
}

/// Next update on the channel, failing the test if none arrives
pub async fn next_update(rx: &mut mpsc::UnboundedReceiver<ViewUpdate>) -> ViewUpdate {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for view update")
        .expect("sink channel closed")
}

/// Collect network-originated updates up to and including the next terminal one
pub async fn network_events_until_terminal(
    rx: &mut mpsc::UnboundedReceiver<ViewUpdate>,
) -> Vec<ViewUpdate> {
    let mut events = Vec::new();
    loop {
        let update = next_update(rx).await;
        if update.is_from_cache() {
            continue;
        }
        let terminal = update.is_terminal();
        events.push(update);
        if terminal {
            return events;
        }
    }
}

/// Collect every update, cache snapshots included, up to the next terminal one
pub async fn updates_until_terminal(
    rx: &mut mpsc::UnboundedReceiver<ViewUpdate>,
) -> Vec<ViewUpdate> {
    let mut updates = Vec::new();
    loop {
        let update = next_update(rx).await;
        let terminal = update.is_terminal();
        updates.push(update);
        if terminal {
            return updates;
        }
    }
}

/// Wait until the published session state satisfies `pred`
pub async fn wait_for_session(
    rx: &mut watch::Receiver<SessionState>,
    pred: impl FnMut(&SessionState) -> bool,
) {
    timeout(WAIT, async { rx.wait_for(pred).await.map(|_| ()) })
        .await
        .expect("timed out waiting for session state")
        .expect("engine stopped");
}

pub fn singer(id: u64, name: &str) -> Singer {
    Singer::new(id, name)
}

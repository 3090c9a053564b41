//! SQLite-backed singer cache
//!
//! Writes replace the whole table inside one transaction. Every committed
//! write bumps a version counter on a `watch` channel; each stream returned
//! by `read()` re-queries the table when it sees the counter move.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::stream::{self, StreamExt};
use rusqlite::{params, Connection, Transaction};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::error::{CacheError, CacheResult};
use super::schema::{init_schema, needs_init};
use super::{CacheStore, SnapshotStream};
use crate::config::Config;
use crate::models::{Cover, Singer};

/// SQLite implementation of [`CacheStore`]
///
/// Cheap to clone; clones share the connection and the change feed.
#[derive(Clone)]
pub struct SqliteCache {
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Connection>,
    version: watch::Sender<u64>,
    path: Option<PathBuf>,
}

impl SqliteCache {
    /// Open or create the cache file under the configured data directory
    pub fn open(config: &Config) -> CacheResult<Self> {
        let path = config.cache_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path).map_err(|source| CacheError::Open {
            path: path.clone(),
            source,
        })?;

        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        debug!("Opened singer cache at {:?}", path);
        Ok(Self::from_connection(conn, Some(path)))
    }

    /// Open an in-memory cache (for testing and ephemeral sessions)
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self::from_connection(conn, None))
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                version,
                path,
            }),
        }
    }

    /// Location of the cache file, `None` for in-memory caches
    pub fn path(&self) -> Option<&PathBuf> {
        self.inner.path.as_ref()
    }

    /// Load every cached singer, in stored order
    pub fn load_all(&self) -> CacheResult<Vec<Singer>> {
        self.inner.load_all()
    }

    /// Number of cached singers
    pub fn count(&self) -> CacheResult<usize> {
        let conn = self.inner.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM singers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Replace the cached list, reporting failures to the caller
    ///
    /// A singer id listed twice keeps its first entry and position.
    pub fn try_write(&self, singers: &[Singer]) -> CacheResult<()> {
        let mut seen = HashSet::with_capacity(singers.len());
        let mut stored = 0;
        {
            let mut conn = self.inner.lock();
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM singers", [])?;
            for singer in singers {
                if !seen.insert(singer.id) {
                    warn!("Skipping duplicate singer id {} ({})", singer.id, singer.name);
                    continue;
                }
                insert_singer(&tx, stored, singer)?;
                stored += 1;
            }
            tx.commit()?;
        }

        self.inner.version.send_modify(|v| *v += 1);
        debug!("Cached {} singers", stored);
        Ok(())
    }

    /// Remove every cached singer
    ///
    /// Subscribers see an empty snapshot.
    pub fn clear(&self) -> CacheResult<()> {
        self.try_write(&[])
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-write leaves the transaction rolled back, so the
        // connection is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load_all(&self) -> CacheResult<Vec<Singer>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, genres, tracks, albums, link, description, cover_small, cover_big
            FROM singers
            ORDER BY position
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(SingerRow {
                id: row.get(0)?,
                name: row.get(1)?,
                genres: row.get(2)?,
                tracks: row.get(3)?,
                albums: row.get(4)?,
                link: row.get(5)?,
                description: row.get(6)?,
                cover_small: row.get(7)?,
                cover_big: row.get(8)?,
            })
        })?;

        let mut singers = Vec::new();
        for row in rows {
            singers.push(row?.hydrate()?);
        }
        Ok(singers)
    }
}

impl CacheStore for SqliteCache {
    fn read(&self) -> SnapshotStream {
        let inner = Arc::clone(&self.inner);
        let rx = inner.version.subscribe();

        stream::unfold((inner, rx, true), |(inner, mut rx, mut first)| async move {
            loop {
                if !first && rx.changed().await.is_err() {
                    return None;
                }
                first = false;

                match inner.load_all() {
                    Ok(singers) => return Some((singers, (inner, rx, false))),
                    Err(e) => warn!("Failed to read singer cache: {}", e),
                }
            }
        })
        .boxed()
    }

    fn write(&self, singers: &[Singer]) {
        if let Err(e) = self.try_write(singers) {
            warn!("Failed to write singer cache: {}", e);
        }
    }
}

/// Raw row as stored in SQLite
struct SingerRow {
    id: i64,
    name: String,
    genres: String,
    tracks: i64,
    albums: i64,
    link: Option<String>,
    description: String,
    cover_small: Option<String>,
    cover_big: Option<String>,
}

impl SingerRow {
    fn hydrate(self) -> CacheResult<Singer> {
        let genres: Vec<String> = serde_json::from_str(&self.genres)?;
        let cover = match (self.cover_small, self.cover_big) {
            (None, None) => None,
            (small, big) => Some(Cover {
                small: small.unwrap_or_default(),
                big: big.unwrap_or_default(),
            }),
        };

        Ok(Singer {
            id: self.id as u64,
            name: self.name,
            genres,
            tracks: self.tracks as u32,
            albums: self.albums as u32,
            link: self.link,
            description: self.description,
            cover,
        })
    }
}

fn insert_singer(tx: &Transaction, position: usize, singer: &Singer) -> CacheResult<()> {
    let genres = serde_json::to_string(&singer.genres)?;
    let (cover_small, cover_big) = match &singer.cover {
        Some(cover) => (Some(cover.small.as_str()), Some(cover.big.as_str())),
        None => (None, None),
    };

    tx.execute(
        r#"
        INSERT INTO singers
            (id, position, name, genres, tracks, albums, link, description, cover_small, cover_big)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            singer.id as i64,
            position as i64,
            singer.name,
            genres,
            singer.tracks as i64,
            singer.albums as i64,
            singer.link,
            singer.description,
            cover_small,
            cover_big,
        ],
    )?;
    Ok(())
}

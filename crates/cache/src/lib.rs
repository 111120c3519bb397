//! In-memory TTL cache for read-heavy, infrequently-changing API data.
//!
//! A process-local key-value store wrapping "fetch or compute" calls.
//! Entries expire at an absolute deadline; an expired entry is treated as
//! absent on read, and a background sweep purges expired entries to bound
//! memory. Invalidation is by exact key or by glob pattern (`*` matches any
//! run of characters), which is how mutations clear entity-scoped keys.
//!
//! The cache is best-effort and holds no locks across compute calls:
//! concurrent misses on the same key each run their compute function and the
//! last writer's entry wins. Reads are idempotent so this loses nothing but
//! a little duplicated work.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub mod invalidate;

/// Sentinel returned by [`Cache::ttl_remaining`] for absent or expired keys.
pub const TTL_ABSENT: i64 = -2;

/// A stored value with its expiry deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-memory TTL key-value cache.
///
/// Constructed once at process start and injected into services as an
/// `Arc<Cache>`; tests build their own instance.
#[derive(Debug)]
pub struct Cache {
    entries: RwLock<HashMap<String, Entry>>,
    default_ttl: Duration,
}

impl Cache {
    /// Create a cache whose `set` calls fall back to `default_ttl` when no
    /// per-entry TTL is given.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Fetch a live (non-expired) value. Expired entries are dropped on read.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // The entry exists but is expired; drop it under a write lock.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        None
    }

    /// Store a value with expiry `now + ttl` (default TTL when `None`).
    pub async fn set(&self, key: &str, value: serde_json::Value, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry { value, expires_at });
    }

    /// Remove a key. Returns `true` if a live entry was removed.
    pub async fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(entry) => !entry.is_expired(now),
            None => false,
        }
    }

    /// Remove every key matching a glob pattern, where `*` matches any run
    /// of characters and everything else is literal. Returns the number of
    /// entries removed.
    ///
    /// Used for invalidation sweeps such as `project:5:*`.
    pub async fn delete_pattern(&self, pattern: &str) -> usize {
        let regex = glob_to_regex(pattern);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !regex.is_match(key));
        before - entries.len()
    }

    /// Serve a live entry for `key`, or run `compute`, store its result with
    /// the given TTL, and return it.
    ///
    /// No per-key locking: two concurrent misses both execute `compute` and
    /// the last writer's entry wins. A compute error is returned uncached;
    /// a cache problem must never block the primary operation.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<serde_json::Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<serde_json::Value, E>>,
    {
        if let Some(hit) = self.get(key).await {
            return Ok(hit);
        }
        let value = compute().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }

    /// Remaining whole seconds before `key` expires, or [`TTL_ABSENT`] when
    /// the key is absent or already expired.
    pub async fn ttl_remaining(&self, key: &str) -> i64 {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.expires_at.duration_since(now).as_secs() as i64
            }
            _ => TTL_ABSENT,
        }
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry. Returns the number purged.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// Compile a glob pattern (`*` wildcard, everything else literal) into an
/// anchored regex.
fn glob_to_regex(pattern: &str) -> regex::Regex {
    let mut escaped = String::with_capacity(pattern.len() + 8);
    escaped.push('^');
    for (i, part) in pattern.split('*').enumerate() {
        if i > 0 {
            escaped.push_str(".*");
        }
        escaped.push_str(&regex::escape(part));
    }
    escaped.push('$');
    // The pattern is fully escaped apart from the `.*` runs we inserted, so
    // compilation cannot fail on user input.
    regex::Regex::new(&escaped).unwrap_or_else(|_| regex::Regex::new("^$").unwrap())
}

/// Spawn the periodic expired-entry sweep.
///
/// Purely a memory bound: correctness never depends on the sweep because
/// expired entries are already invisible to reads. Stops when `cancel` fires.
pub fn spawn_sweeper(
    cache: Arc<Cache>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = cache.purge_expired().await;
                    if purged > 0 {
                        tracing::debug!(purged, "Purged expired cache entries");
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("Cache sweeper stopped");
                    break;
                }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// src/application/query_client.rs
//
// Client-side query cache. One handle is created at start-up and cloned into
// whatever needs it; clones share the same entries.
//
// Per key: Idle -> Fetching -> {Success, Error}, Success -> Stale on
// invalidation, and any state -> Fetching on the next read that needs data.
use crate::domain::RequestError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, instrument, trace};

type AnyValue = Arc<dyn Any + Send + Sync>;
type SharedLoad = Shared<BoxFuture<'static, Result<AnyValue, RequestError>>>;
type Entries = HashMap<QueryKey, CacheEntry>;

/// Ordered key segments, e.g. `["notes", "list", "1", "20", "", "createdAt", "desc"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Segment-wise prefix match, so `["notes"]` matches every notes query
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Fetching,
    Success,
    Stale,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// A successful result younger than this is served without a request
    pub stale_time: Duration,
    /// An unobserved, idle entry older than this is evicted
    pub gc_time: Duration,
}

impl QueryOptions {
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            stale_time,
            gc_time,
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(crate::constants::CACHE_GC_TIME_SECS),
        }
    }
}

struct CacheEntry {
    value: Option<AnyValue>,
    updated_at: Option<Instant>,
    last_access: Instant,
    options: QueryOptions,
    // Bumped by every invalidation; a load started under an older generation
    // must not mark the entry fresh.
    generation: u64,
    // Generation the stored value was loaded under
    value_generation: u64,
    invalidated: bool,
    inflight: Option<(u64, SharedLoad)>,
    status: watch::Sender<QueryStatus>,
}

impl CacheEntry {
    fn new(options: QueryOptions, now: Instant) -> Self {
        let (status, _) = watch::channel(QueryStatus::Idle);
        Self {
            value: None,
            updated_at: None,
            last_access: now,
            options,
            generation: 0,
            value_generation: 0,
            invalidated: false,
            inflight: None,
            status,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        !self.invalidated
            && self
                .updated_at
                .is_some_and(|at| now.duration_since(at) < self.options.stale_time)
    }

    fn is_collectable(&self, now: Instant) -> bool {
        self.inflight.is_none()
            && self.status.receiver_count() == 0
            && now.duration_since(self.last_access) > self.options.gc_time
    }

    fn cached<T: Clone + 'static>(&self) -> Option<T> {
        self.value
            .as_ref()
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }
}

/// Shared handle to the query cache
#[derive(Clone)]
pub struct QueryClient {
    entries: Arc<Mutex<Entries>>,
    default_options: QueryOptions,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.lock().len())
            .field("default_options", &self.default_options)
            .finish()
    }
}

impl QueryClient {
    /// `default_options` apply to entries created by `set` or `subscribe`
    pub fn new(default_options: QueryOptions) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            default_options,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the fresh cached value for `key`, or load it.
    ///
    /// Concurrent callers for the same key share a single load and all see
    /// its result, including its error.
    pub async fn fetch_or_cached<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        loader: F,
    ) -> Result<T, RequestError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        self.load(key, options, loader, false, None).await
    }

    /// Load `key` regardless of freshness; joins a load already in flight.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        loader: F,
    ) -> Result<T, RequestError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        self.load(key, options, loader, true, None).await
    }

    /// Like [`fetch`](Self::fetch), for a loader that builds on data read at
    /// `generation` (see [`generation`](Self::generation)).
    ///
    /// If `key` was invalidated since then, the result is stored but stays stale.
    pub async fn fetch_since<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        generation: u64,
        loader: F,
    ) -> Result<T, RequestError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        self.load(key, options, loader, true, Some(generation)).await
    }

    /// Invalidation counter of `key`, 0 for an unknown key
    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.lock().get(key).map_or(0, |entry| entry.generation)
    }

    async fn load<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        loader: F,
        force: bool,
        since: Option<u64>,
    ) -> Result<T, RequestError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        let load = {
            let mut entries = self.lock();
            let now = Instant::now();
            Self::sweep(&mut entries, now);

            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(options, now));
            entry.last_access = now;
            entry.options = options;

            if !force && entry.is_fresh(now) {
                if let Some(value) = entry.cached::<T>() {
                    trace!(%key, "Serving fresh cache entry");
                    return Ok(value);
                }
            }

            // A load started before the last invalidation may return data
            // older than the caller has to see, so it is not joined.
            let generation = since.map_or(entry.generation, |g| g.min(entry.generation));
            match entry.inflight.clone() {
                Some((started, load)) if started >= generation => {
                    debug!(%key, "Joining in-flight load");
                    load
                }
                superseded => {
                    if superseded.is_some() {
                        debug!(%key, generation, "In-flight load predates invalidation, starting another");
                    }
                    let load = self.start_load(&key, generation, loader());
                    entry.inflight = Some((generation, load.clone()));
                    entry.status.send_replace(QueryStatus::Fetching);
                    load
                }
            }
        };

        let value = load.await?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| RequestError::Decode(format!("cached value for {key} has another type")))
    }

    fn start_load<T, Fut>(&self, key: &QueryKey, generation: u64, fut: Fut) -> SharedLoad
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        debug!(%key, "Starting load");
        // Weak: the entry owns this future, so a strong handle would be a cycle.
        let entries = Arc::downgrade(&self.entries);
        let key = key.clone();
        async move {
            let result = fut.await.map(|value| Arc::new(value) as AnyValue);
            Self::finish_load(&entries, &key, generation, &result);
            result
        }
        .boxed()
        .shared()
    }

    fn finish_load(
        entries: &Weak<Mutex<Entries>>,
        key: &QueryKey,
        generation: u64,
        result: &Result<AnyValue, RequestError>,
    ) {
        let Some(entries) = entries.upgrade() else {
            return;
        };
        let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = entries.get_mut(key) else {
            return;
        };

        let now = Instant::now();
        entry.last_access = now;
        if entry
            .inflight
            .as_ref()
            .is_some_and(|(started, _)| *started == generation)
        {
            entry.inflight = None;
        }
        // A newer load owns the status until it finishes
        let newer_in_flight = entry.inflight.is_some();
        let superseded = entry.value.is_some() && entry.value_generation > generation;
        match result {
            Ok(_) if superseded => {
                debug!(%key, generation, "Discarding result of superseded load");
            }
            Ok(value) => {
                entry.value = Some(Arc::clone(value));
                entry.value_generation = generation;
                entry.updated_at = Some(now);
                entry.invalidated = entry.generation != generation;
                let status = if newer_in_flight {
                    QueryStatus::Fetching
                } else if entry.invalidated {
                    QueryStatus::Stale
                } else {
                    QueryStatus::Success
                };
                entry.status.send_replace(status);
                debug!(%key, ?status, "Load finished");
            }
            Err(err) => {
                if !newer_in_flight {
                    entry.status.send_replace(QueryStatus::Error);
                }
                debug!(%key, %err, "Load failed, keeping previous value");
            }
        }
    }

    /// Last successful value for `key`, fresh or not
    pub fn get<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let mut entries = self.lock();
        let entry = entries.get_mut(key)?;
        entry.last_access = Instant::now();
        entry.cached::<T>()
    }

    /// Store `value` as a fresh, successful result for `key`
    pub fn set<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let mut entries = self.lock();
        let now = Instant::now();
        let entry = entries
            .entry(key)
            .or_insert_with(|| CacheEntry::new(self.default_options, now));
        entry.value = Some(Arc::new(value));
        entry.value_generation = entry.generation;
        entry.updated_at = Some(now);
        entry.last_access = now;
        entry.invalidated = false;
        entry.status.send_replace(QueryStatus::Success);
    }

    /// Mark every entry under `prefix` stale; returns how many were hit
    #[instrument(level = "debug", skip_all, fields(prefix = %prefix))]
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.lock();
        let mut count = 0;
        for (_, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
            entry.generation += 1;
            entry.invalidated = true;
            let current = *entry.status.borrow();
            if current == QueryStatus::Success {
                entry.status.send_replace(QueryStatus::Stale);
            }
            count += 1;
        }
        info!(invalidated = count, "Invalidated cached queries");
        count
    }

    /// Watch the status of `key`. The entry is retained while subscribed.
    pub fn subscribe(&self, key: &QueryKey) -> watch::Receiver<QueryStatus> {
        let mut entries = self.lock();
        let now = Instant::now();
        entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(self.default_options, now))
            .status
            .subscribe()
    }

    pub fn status(&self, key: &QueryKey) -> Option<QueryStatus> {
        self.lock().get(key).map(|entry| *entry.status.borrow())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Evict idle, unobserved entries past their retention; returns the count
    pub fn collect_garbage(&self) -> usize {
        Self::sweep(&mut self.lock(), Instant::now())
    }

    fn sweep(entries: &mut Entries, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|key, entry| {
            let keep = !entry.is_collectable(now);
            if !keep {
                trace!(%key, "Evicting idle cache entry");
            }
            keep
        });
        before - entries.len()
    }
}

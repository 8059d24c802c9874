//! Batching, caching key loader.
//!
//! A [`Loader`] collapses the individual `load(key)` calls made while resolving
//! one request into a few calls of a batch function. Keys are collected into an
//! open batch that is dispatched as soon as it holds `batch_size` distinct keys or
//! when the debounce window that started with its first key elapses, whichever
//! comes first. Outcomes, errors included, are cached per key until cleared.
//!
//! ## Concurrency
//!
//! The cache sits behind its own read-write lock, so cache hits never contend
//! with batching. The open batch and its deadline are owned by a single
//! coordinator task that callers reach through a channel. Every dispatch runs on
//! its own task, so a slow batch function never holds up the next batch.

mod graph;

pub use graph::RequestLoaders;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};

use crate::config::LoaderConfig;
use crate::error::LoadError;

/// Outcome of loading one key.
pub type LoadResult<V> = Result<V, LoadError>;

/// Fetches the values for a batch of keys.
///
/// The returned outcomes are matched to the keys by position. Missing trailing
/// outcomes become [`LoadError::BatchShortfall`]; extra ones are ignored.
pub trait BatchFn<K, V>: Send + Sync + 'static {
    fn load(&self, keys: Vec<K>) -> BoxFuture<'static, Vec<LoadResult<V>>>;
}

impl<K, V, F, Fut> BatchFn<K, V> for F
where
    F: Fn(Vec<K>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Vec<LoadResult<V>>> + Send + 'static,
{
    fn load(&self, keys: Vec<K>) -> BoxFuture<'static, Vec<LoadResult<V>>> {
        (self)(keys).boxed()
    }
}

/// Loader counters.
#[derive(Debug, Default)]
pub struct LoaderStats {
    cache_hits: AtomicU64,
    keys_requested: AtomicU64,
    batches_dispatched: AtomicU64,
    keys_fetched: AtomicU64,
}

impl LoaderStats {
    /// Loads answered straight from the cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Every `load` call, hit or miss.
    pub fn keys_requested(&self) -> u64 {
        self.keys_requested.load(Ordering::Relaxed)
    }

    /// Calls made to the batch function.
    pub fn batches_dispatched(&self) -> u64 {
        self.batches_dispatched.load(Ordering::Relaxed)
    }

    /// Distinct keys handed to the batch function across all batches.
    pub fn keys_fetched(&self) -> u64 {
        self.keys_fetched.load(Ordering::Relaxed)
    }
}

struct Request<K, V> {
    key: K,
    reply: oneshot::Sender<LoadResult<V>>,
}

type Cache<K, V> = Arc<RwLock<HashMap<K, LoadResult<V>>>>;

/// Batching, caching loader for values of type `V` keyed by `K`.
///
/// Clones share the cache and the open batch.
pub struct Loader<K, V> {
    cache: Cache<K, V>,
    requests: mpsc::UnboundedSender<Request<K, V>>,
    stats: Arc<LoaderStats>,
}

impl<K, V> Clone for Loader<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            requests: self.requests.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> Loader<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a loader and start its coordinator.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(batch_fn: impl BatchFn<K, V>, config: LoaderConfig) -> Self {
        let cache: Cache<K, V> = Arc::new(RwLock::new(HashMap::new()));
        let stats = Arc::new(LoaderStats::default());
        let (requests, inbox) = mpsc::unbounded_channel();

        let coordinator = Coordinator {
            batch_fn: Arc::new(batch_fn),
            cache: Arc::clone(&cache),
            stats: Arc::clone(&stats),
            batch_size: config.effective_batch_size(),
            wait: config.effective_wait(),
            keys: Vec::new(),
            waiters: HashMap::new(),
            deadline: None,
        };
        tokio::spawn(coordinator.run(inbox));

        Self {
            cache,
            requests,
            stats,
        }
    }

    /// Load the value for `key`, joining the open batch on a cache miss.
    pub async fn load(&self, key: K) -> LoadResult<V> {
        self.stats.keys_requested.fetch_add(1, Ordering::Relaxed);

        let cached = self.cache.read().get(&key).cloned();
        if let Some(outcome) = cached {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("loader cache hit");
            return outcome;
        }

        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request { key, reply })
            .map_err(|_| LoadError::Closed)?;
        response.await.map_err(|_| LoadError::Closed)?
    }

    /// Load `key`, giving up with [`LoadError::Cancelled`] if `cancel` completes first.
    ///
    /// Giving up only affects this caller: the key stays in its batch and other
    /// callers waiting on it still get the value.
    pub async fn load_until<C>(&self, key: K, cancel: C) -> LoadResult<V>
    where
        C: Future,
    {
        tokio::select! {
            biased;
            outcome = self.load(key) => outcome,
            _ = cancel => Err(LoadError::Cancelled),
        }
    }

    /// Load `key`, giving up after `timeout`.
    pub async fn load_timeout(&self, key: K, timeout: Duration) -> LoadResult<V> {
        self.load_until(key, tokio::time::sleep(timeout)).await
    }

    /// Load several keys at once. Outcomes are returned in key order.
    pub async fn load_many(&self, keys: impl IntoIterator<Item = K>) -> Vec<LoadResult<V>> {
        join_all(keys.into_iter().map(|key| self.load(key))).await
    }

    /// Seed the cache. Replaces any outcome already cached for `key`.
    pub fn prime(&self, key: K, value: V) {
        self.cache.write().insert(key, Ok(value));
    }

    /// Drop the cached outcome for `key`.
    pub fn clear(&self, key: &K) {
        self.cache.write().remove(key);
    }

    /// Drop every cached outcome.
    pub fn clear_all(&self) {
        self.cache.write().clear();
    }

    /// Counters shared by every clone of this loader.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }
}

/// Owns the open batch. Runs until every [`Loader`] handle is gone, then flushes.
struct Coordinator<K, V> {
    batch_fn: Arc<dyn BatchFn<K, V>>,
    cache: Cache<K, V>,
    stats: Arc<LoaderStats>,
    batch_size: usize,
    wait: Duration,
    /// distinct keys of the open batch, in arrival order
    keys: Vec<K>,
    waiters: HashMap<K, Vec<oneshot::Sender<LoadResult<V>>>>,
    deadline: Option<Instant>,
}

async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl<K, V> Coordinator<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Request<K, V>>) {
        loop {
            tokio::select! {
                request = inbox.recv() => match request {
                    Some(request) => self.enqueue(request),
                    None => break,
                },
                _ = expire(self.deadline) => self.dispatch(),
            }
        }
        self.dispatch();
    }

    fn enqueue(&mut self, request: Request<K, V>) {
        match self.waiters.entry(request.key) {
            Entry::Occupied(mut entry) => entry.get_mut().push(request.reply),
            Entry::Vacant(entry) => {
                self.keys.push(entry.key().clone());
                entry.insert(vec![request.reply]);
            }
        }

        if self.keys.len() >= self.batch_size {
            self.dispatch();
        } else if self.deadline.is_none() {
            self.deadline = Some(Instant::now() + self.wait);
        }
    }

    fn dispatch(&mut self) {
        self.deadline = None;
        if self.keys.is_empty() {
            return;
        }

        let keys = std::mem::take(&mut self.keys);
        let mut waiters = std::mem::take(&mut self.waiters);
        let batch_fn = Arc::clone(&self.batch_fn);
        let cache = Arc::clone(&self.cache);

        self.stats.batches_dispatched.fetch_add(1, Ordering::Relaxed);
        self.stats
            .keys_fetched
            .fetch_add(keys.len() as u64, Ordering::Relaxed);
        tracing::debug!(batch_size = keys.len(), "dispatching loader batch");

        tokio::spawn(async move {
            let outcomes = batch_fn.load(keys.clone()).await;
            if outcomes.len() < keys.len() {
                tracing::warn!(
                    keys = keys.len(),
                    outcomes = outcomes.len(),
                    "batch function returned fewer results than keys"
                );
            }

            let mut outcomes = outcomes.into_iter();
            let mut cache = cache.write();
            for key in keys {
                let outcome = outcomes.next().unwrap_or(Err(LoadError::BatchShortfall));
                for reply in waiters.remove(&key).unwrap_or_default() {
                    // the caller may have given up already
                    let _ = reply.send(outcome.clone());
                }
                cache.insert(key, outcome);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    type Calls = Arc<Mutex<Vec<Vec<u64>>>>;

    /// Loader that doubles its keys and records every batch.
    fn doubling(config: LoaderConfig) -> (Loader<u64, u64>, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let loader = Loader::new(
            move |keys: Vec<u64>| {
                recorded.lock().push(keys.clone());
                async move {
                    keys.into_iter()
                        .map(|k| Ok(k * 2))
                        .collect::<Vec<LoadResult<u64>>>()
                }
            },
            config,
        );
        (loader, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_loads_share_a_batch() {
        let (loader, calls) = doubling(LoaderConfig::default());

        let (a, b, c) = tokio::join!(loader.load(1), loader.load(2), loader.load(3));
        assert_eq!((a, b, c), (Ok(2), Ok(4), Ok(6)));
        assert_eq!(*calls.lock(), vec![vec![1, 2, 3]]);
        assert_eq!(loader.stats().batches_dispatched(), 1);
        assert_eq!(loader.stats().keys_fetched(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_batch_dispatches_immediately() {
        let (loader, calls) = doubling(LoaderConfig::new(2, Duration::from_secs(60)));

        let start = Instant::now();
        let results = loader.load_many([1, 2]).await;
        assert_eq!(results, vec![Ok(2), Ok(4)]);
        assert!(start.elapsed() < Duration::from_secs(60));

        let results = loader.load_many([3, 4, 5]).await;
        assert_eq!(results, vec![Ok(6), Ok(8), Ok(10)]);

        let mut batches = calls.lock().clone();
        batches.sort();
        assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_keys_fetched_once() {
        let (loader, calls) = doubling(LoaderConfig::default());

        let results = loader.load_many([7, 7, 8]).await;
        assert_eq!(results, vec![Ok(14), Ok(14), Ok(16)]);
        assert_eq!(*calls.lock(), vec![vec![7, 8]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_outcome_skips_batching() {
        let (loader, calls) = doubling(LoaderConfig::default());

        assert_eq!(loader.load(5).await, Ok(10));
        assert_eq!(loader.load(5).await, Ok(10));
        assert_eq!(calls.lock().len(), 1);
        assert_eq!(loader.stats().cache_hits(), 1);
        assert_eq!(loader.stats().keys_requested(), 2);

        loader.clear(&5);
        assert_eq!(loader.load(5).await, Ok(10));
        assert_eq!(calls.lock().len(), 2);

        loader.clear_all();
        assert_eq!(loader.load(5).await, Ok(10));
        assert_eq!(calls.lock().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_cached_per_key() {
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let loader: Loader<u64, String> = Loader::new(
            move |keys: Vec<u64>| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    keys.into_iter()
                        .map(|k| {
                            if k % 2 == 0 {
                                Ok(format!("v{k}"))
                            } else {
                                Err(LoadError::Fetch(format!("odd key {k}")))
                            }
                        })
                        .collect::<Vec<LoadResult<String>>>()
                }
            },
            LoaderConfig::default(),
        );

        let results = loader.load_many([1, 2]).await;
        assert_eq!(results[0], Err(LoadError::Fetch("odd key 1".into())));
        assert_eq!(results[1], Ok("v2".to_string()));

        assert_eq!(loader.load(1).await, Err(LoadError::Fetch("odd key 1".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_batch_result() {
        let loader: Loader<u64, u64> = Loader::new(
            |keys: Vec<u64>| async move {
                keys.into_iter()
                    .take(1)
                    .map(Ok)
                    .collect::<Vec<LoadResult<u64>>>()
            },
            LoaderConfig::default(),
        );

        let results = loader.load_many([1, 2, 3]).await;
        assert_eq!(
            results,
            vec![Ok(1), Err(LoadError::BatchShortfall), Err(LoadError::BatchShortfall)]
        );
        assert_eq!(
            results[1].clone().unwrap_err().to_string(),
            "batch function returned fewer results than keys"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_is_per_caller() {
        let loader: Loader<u64, u64> = Loader::new(
            |keys: Vec<u64>| async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                keys.into_iter().map(Ok).collect::<Vec<LoadResult<u64>>>()
            },
            LoaderConfig::default(),
        );

        let (impatient, patient) = tokio::join!(
            loader.load_timeout(1, Duration::from_millis(10)),
            loader.load(1)
        );
        assert_eq!(impatient, Err(LoadError::Cancelled));
        assert_eq!(patient, Ok(1));

        // the cancelled caller's key still landed in the cache
        assert_eq!(loader.load_timeout(1, Duration::from_millis(1)).await, Ok(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prime_replaces_cached_value() {
        let (loader, calls) = doubling(LoaderConfig::default());

        loader.prime(1, 100);
        loader.prime(1, 200);
        assert_eq!(loader.load(1).await, Ok(200));
        assert!(calls.lock().is_empty());

        assert_eq!(loader.load(2).await, Ok(4));
        loader.prime(2, 99);
        assert_eq!(loader.load(2).await, Ok(99));
        assert_eq!(calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_cache() {
        let (loader, calls) = doubling(LoaderConfig::default());
        let other = loader.clone();

        assert_eq!(loader.load(3).await, Ok(6));
        assert_eq!(other.load(3).await, Ok(6));
        assert_eq!(calls.lock().len(), 1);
    }
}

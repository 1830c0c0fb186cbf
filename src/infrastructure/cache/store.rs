//! Process-local cache store with per-key single-flight

use std::fmt;
use std::future::{ready, Future};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{CacheEntry, CachePolicy, DomainError, EntryState, LookupOutcome};
use crate::infrastructure::observability::{record_cache_lookup, record_cache_sweep};

type FlightResult<V> = Result<Arc<CacheEntry<V>>, DomainError>;
type Flight<V> = Shared<BoxFuture<'static, FlightResult<V>>>;

/// Result of [`CacheStore::get_or_fetch`]
#[derive(Debug, Clone)]
pub struct Lookup<V> {
    pub entry: Arc<CacheEntry<V>>,
    pub outcome: LookupOutcome,
}

impl<V> Lookup<V> {
    pub fn value(&self) -> &V {
        self.entry.value()
    }
}

/// Key/value store with per-entry TTL and tags
///
/// Concurrent misses for one key share a single fetch: the first caller
/// registers a shared future under the key and every other caller awaits it.
/// Flights for different keys are independent.
pub struct CacheStore<V> {
    name: &'static str,
    policy: CachePolicy,
    entries: Cache<String, Arc<CacheEntry<V>>>,
    flights: Cache<String, Flight<V>>,
}

impl<V> Clone for CacheStore<V>
where
    V: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            policy: self.policy,
            entries: self.entries.clone(),
            flights: self.flights.clone(),
        }
    }
}

impl<V> fmt::Debug for CacheStore<V>
where
    V: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl<V> CacheStore<V>
where
    V: Send + Sync + 'static,
{
    pub fn new(name: &'static str, policy: CachePolicy, max_capacity: u64) -> Self {
        Self {
            name,
            policy,
            entries: Cache::builder().max_capacity(max_capacity).build(),
            flights: Cache::builder().build(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entry under `key`
    ///
    /// A strict store reports entries past their TTL as absent; a
    /// stale-while-revalidate store returns them so the caller can serve them.
    pub async fn get(&self, key: &str) -> Option<Arc<CacheEntry<V>>> {
        let entry = self.entries.get(key).await?;

        match self.policy {
            CachePolicy::StrictTtl if entry.is_expired_at(Instant::now()) => None,
            _ => Some(entry),
        }
    }

    /// Stores `value`, replacing any previous entry under `key`
    pub async fn set(
        &self,
        key: &str,
        value: V,
        ttl: Duration,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Arc<CacheEntry<V>> {
        let entry = Arc::new(CacheEntry::new(key, value, ttl, tags));
        self.entries.insert(key.to_string(), entry.clone()).await;
        entry
    }

    pub async fn state(&self, key: &str) -> Option<EntryState> {
        let entry = self.entries.get(key).await?;

        if entry.is_fresh_at(Instant::now()) {
            Some(EntryState::Fresh)
        } else if self.flights.contains_key(key) {
            Some(EntryState::Refreshing)
        } else {
            Some(EntryState::Stale)
        }
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Removes every entry carrying `tag`, returning how many were removed
    pub async fn invalidate_by_tag(&self, tag: &str) -> usize {
        let keys: Vec<Arc<String>> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.has_tag(tag))
            .map(|(key, _)| key)
            .collect();

        for key in &keys {
            self.entries.invalidate(key.as_str()).await;
        }

        debug!(store = self.name, tag, removed = keys.len(), "Invalidated cache tag");
        keys.len()
    }

    /// Removes entries whose TTL has elapsed
    ///
    /// Each removal re-checks the entry under the key, so a value replaced
    /// between the scan and the removal survives.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();

        let expired: Vec<Arc<String>> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key)
            .collect();

        let mut removed = 0;
        for key in expired {
            let result = self
                .entries
                .entry_by_ref(key.as_str())
                .and_compute_with(|current| {
                    let op = match current {
                        Some(entry) if entry.value().is_expired_at(now) => Op::Remove,
                        _ => Op::Nop,
                    };
                    ready(op)
                })
                .await;

            if matches!(result, CompResult::Removed(_)) {
                removed += 1;
            }
        }

        record_cache_sweep(self.name, removed);
        removed
    }

    /// Returns the cached value for `key`, fetching it when needed
    ///
    /// Fresh entries are returned as hits. Past the TTL a stale-while-revalidate
    /// store returns the stale entry and refreshes it in the background, while
    /// a strict store fetches synchronously. Misses join the key's flight.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        tags: &[&str],
        fetch: F,
    ) -> Result<Lookup<V>, DomainError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();

        if let Some(entry) = self.entries.get(key).await {
            if entry.is_fresh_at(Instant::now()) {
                return Ok(self.lookup(entry, LookupOutcome::Hit));
            }

            if self.policy == CachePolicy::StaleWhileRevalidate {
                self.spawn_refresh(key.to_string(), ttl, tags, fetch);
                return Ok(self.lookup(entry, LookupOutcome::Stale));
            }
        }

        let entry = self.join_flight(key, ttl, tags, fetch).await?;
        Ok(self.lookup(entry, LookupOutcome::Miss))
    }

    fn lookup(&self, entry: Arc<CacheEntry<V>>, outcome: LookupOutcome) -> Lookup<V> {
        record_cache_lookup(self.name, outcome);
        Lookup { entry, outcome }
    }

    fn spawn_refresh<F, Fut>(&self, key: String, ttl: Duration, tags: Vec<String>, fetch: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        let store = self.clone();

        tokio::spawn(async move {
            match store.join_flight(&key, ttl, tags, fetch).await {
                Ok(_) => debug!(store = store.name, key = %key, "Refreshed stale entry"),
                Err(e) => warn!(
                    store = store.name,
                    key = %key,
                    error = %e,
                    "Background refresh failed, keeping stale entry"
                ),
            }
        });
    }

    async fn join_flight<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        tags: Vec<String>,
        fetch: F,
    ) -> FlightResult<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        let store = self.clone();
        let owned_key = key.to_string();

        // The shared future is lazy: it first runs once it is registered
        // under the key. The caller that registered it also hands a clone to
        // a detached task, so the flight completes and removes itself even
        // when every waiter is dropped.
        let entry = self
            .flights
            .entry(key.to_string())
            .or_insert_with(async move {
                store.lead(owned_key, ttl, tags, fetch).boxed().shared()
            })
            .await;

        let registered = entry.is_fresh();
        let flight = entry.into_value();

        if registered {
            tokio::spawn(flight.clone());
        }

        flight.await
    }

    /// Number of keys with a fetch currently in progress
    pub fn in_flight(&self) -> usize {
        self.flights.iter().count()
    }

    async fn lead<F, Fut>(
        self,
        key: String,
        ttl: Duration,
        tags: Vec<String>,
        fetch: F,
    ) -> FlightResult<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        let fresh = self
            .entries
            .get(&key)
            .await
            .filter(|entry| entry.is_fresh_at(Instant::now()));

        let result = match fresh {
            Some(entry) => Ok(entry),
            None => match AssertUnwindSafe(fetch()).catch_unwind().await {
                Ok(Ok(value)) => Ok(self.set(&key, value, ttl, tags).await),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(DomainError::internal("Cache fetch panicked")),
            },
        };

        self.flights.invalidate(&key).await;
        result
    }
}

//! Cache entries and their freshness lifecycle

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::time::Instant;

/// How a store treats entries whose TTL has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve the stale value immediately and refresh it in the background
    StaleWhileRevalidate,
    /// Report expired entries as absent; the caller recomputes synchronously
    StrictTtl,
}

impl std::fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CachePolicy::StaleWhileRevalidate => write!(f, "stale_while_revalidate"),
            CachePolicy::StrictTtl => write!(f, "strict_ttl"),
        }
    }
}

/// Observable state of a key in a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Fresh,
    Stale,
    /// Stale and a refresh is in flight; reads still return the stale value
    Refreshing,
}

/// How a lookup was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Hit,
    Stale,
    Miss,
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Hit => "hit",
            LookupOutcome::Stale => "stale",
            LookupOutcome::Miss => "miss",
        }
    }
}

/// Immutable cached value; replacing a key stores a new entry
#[derive(Debug)]
pub struct CacheEntry<V> {
    key: String,
    value: V,
    created_at: Instant,
    ttl: Duration,
    tags: BTreeSet<String>,
}

impl<V> CacheEntry<V> {
    pub fn new(
        key: impl Into<String>,
        value: V,
        ttl: Duration,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            created_at: Instant::now(),
            ttl,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Fresh while `now - created_at <= ttl`
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        self.age_at(now) <= self.ttl
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        !self.is_fresh_at(now)
    }

    pub fn remaining_ttl_at(&self, now: Instant) -> Duration {
        self.ttl.saturating_sub(self.age_at(now))
    }
}

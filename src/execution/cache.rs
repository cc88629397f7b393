//! Negative Query Cache
//!
//! Remembers query identities that are known to exceed the execution limit,
//! so that a retry is rejected immediately instead of tying up a worker for
//! another full timeout period.
//!
//! ## Design
//!
//! Membership only: an entry has no payload and no expiry. A query that once
//! ran past the limit is treated as structurally expensive (an unbounded
//! wildcard, say) rather than transiently slow, so there is no removal
//! operation. Restarting the process is the only eviction.
//!
//! The cache is shared by every in-flight request. It is handed to the
//! gateway as an `Arc<NegativeQueryCache>`; `add` and `contains` may be called
//! from any thread and an `add` is visible to every later `contains`.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Identity of a submitted query.
///
/// Compared textually: two queries that mean the same thing but are spelled
/// differently are distinct identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(String);

impl QueryId {
    pub fn new(task: impl Into<String>) -> Self {
        QueryId(task.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryId {
    fn from(task: &str) -> Self {
        QueryId(task.to_string())
    }
}

impl From<String> for QueryId {
    fn from(task: String) -> Self {
        QueryId(task)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NegativeCacheStats {
    /// Number of query identities currently remembered
    pub size: usize,

    /// Number of lookups that found a remembered identity
    pub hits: u64,
}

/// Process-wide set of queries known to time out.
#[derive(Debug, Default)]
pub struct NegativeQueryCache {
    entries: RwLock<HashSet<QueryId>>,
    hits: AtomicU64,
}

impl NegativeQueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `query` is known to exceed the limit.
    pub fn contains(&self, query: &QueryId) -> bool {
        let found = self.entries.read().contains(query);
        if found {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Remember `query` for the rest of the process lifetime.
    ///
    /// Returns `true` if the identity was not yet present.
    pub fn add(&self, query: QueryId) -> bool {
        self.entries.write().insert(query)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> NegativeCacheStats {
        NegativeCacheStats {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }
}

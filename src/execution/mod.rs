//! Query Execution Module
//!
//! Guards against runaway Kernel computations:
//! - Hard deadline enforcement on a detached worker
//! - Negative cache of queries known to exceed the deadline

mod cache;
mod timeout;

pub use cache::{NegativeCacheStats, NegativeQueryCache, QueryId};
pub use timeout::{GuardError, TimedOut, TimeoutGuard, DEFAULT_QUERY_TIMEOUT};

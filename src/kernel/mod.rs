//! Kernel Boundary
//!
//! The Kernel is the corpus search/compute engine. It owns query evaluation
//! and data retrieval; this crate only orchestrates calls into it.
//!
//! All methods are blocking. The gateway always invokes them on a blocking
//! worker (`spawn_blocking`), and `search`/`csvs` additionally run under a
//! `TimeoutGuard`, so an implementation does not need to check for
//! cancellation itself.

mod remote;
mod types;

pub use remote::RemoteKernel;
pub use types::{
    CorpusHeader, CsvOutcome, CsvTable, Message, PassageOutcome, PassageQuery, ProvenanceEntry,
    RenderOptions, SearchOutcome, Severity, TableKind, TableOutcome,
};

/// Kernel error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// The Kernel rejected or failed to evaluate the request
    #[error("{message}")]
    Failed { message: String },

    /// The Kernel gave up on the request itself
    #[error("Kernel reported a timeout")]
    TimedOut,

    /// The Kernel could not be reached
    #[error("Kernel unreachable: {message}")]
    Transport { message: String },

    /// The Kernel answered with something unreadable
    #[error("Malformed Kernel response: {message}")]
    Decode { message: String },
}

impl KernelError {
    pub fn failed(message: impl Into<String>) -> Self {
        KernelError::Failed {
            message: message.into(),
        }
    }
}

/// Result type for Kernel calls
pub type KernelResult<T> = Result<T, KernelError>;

/// The corpus search/compute engine.
pub trait Kernel: Send + Sync + 'static {
    /// Evaluate a search template. May run arbitrarily long.
    fn search(
        &self,
        task: &str,
        batch: usize,
        offset: usize,
        options: &RenderOptions,
    ) -> KernelResult<SearchOutcome>;

    /// Look up sections or tuples by coordinates.
    fn table(&self, kind: TableKind, task: &str, options: &RenderOptions)
        -> KernelResult<TableOutcome>;

    /// Render a passage identified by section coordinates.
    fn passage(&self, query: &PassageQuery, options: &RenderOptions)
        -> KernelResult<PassageOutcome>;

    /// Materialize section, tuple and query results as CSV tables.
    fn csvs(
        &self,
        task: &str,
        tuples: &str,
        sections: &str,
        options: &RenderOptions,
    ) -> KernelResult<CsvOutcome>;

    fn header(&self) -> KernelResult<CorpusHeader>;

    fn css(&self) -> KernelResult<String>;

    fn provenance(&self) -> KernelResult<Vec<ProvenanceEntry>>;

    fn set_names(&self) -> KernelResult<Vec<String>>;
}

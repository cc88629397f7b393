//! Query Gateway
//!
//! Wraps every call into the Kernel. Search and CSV materialization are
//! guarded: a query in the negative cache is rejected without touching the
//! Kernel, and a query that overruns the deadline is added to the cache.
//! Coordinate lookups (tables, passages) and metadata are assumed bounded
//! and only moved off the async executor.
//!
//! No error crosses this boundary as a panic: every failure becomes a
//! `ResponseEnvelope` with `status == false` or a `GatewayError`.

mod envelope;
mod error;
mod passage;
mod request;

pub use envelope::{ResponseEnvelope, DEFAULT_RESULT_KIND};
pub use error::{describe_limit, GatewayError, UNEXPLAINED_FAILURE};
pub use passage::{PassageLink, PassageResponse};
pub use request::{
    parse_opened, DownloadRequest, PassageRequest, RenderForm, SearchRequest, TableRequest,
};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{GatewayConfig, InterfaceConfig};
use crate::execution::{GuardError, NegativeQueryCache, QueryId, TimeoutGuard};
use crate::kernel::{CsvOutcome, Kernel, KernelError, KernelResult, RenderOptions, TableKind};
use crate::metadata::CorpusMetadata;

/// Default number of search results per page
pub const DEFAULT_BATCH: usize = 20;

/// Orchestrates Kernel calls for one serving process.
///
/// Cheap to share behind an `Arc`; all request state lives on the stack of
/// the calling task.
pub struct QueryGateway {
    kernel: Arc<dyn Kernel>,
    wild_queries: Arc<NegativeQueryCache>,
    guard: TimeoutGuard,
    interface_defaults: BTreeMap<String, serde_json::Value>,
    default_batch: usize,
}

impl QueryGateway {
    /// Create a gateway that records overrunning queries in `wild_queries`.
    pub fn new(
        kernel: Arc<dyn Kernel>,
        wild_queries: Arc<NegativeQueryCache>,
        limit: Duration,
    ) -> Self {
        QueryGateway {
            kernel,
            wild_queries,
            guard: TimeoutGuard::new(limit),
            interface_defaults: BTreeMap::new(),
            default_batch: DEFAULT_BATCH,
        }
    }

    pub fn from_config(
        kernel: Arc<dyn Kernel>,
        wild_queries: Arc<NegativeQueryCache>,
        gateway: &GatewayConfig,
        interface: &InterfaceConfig,
    ) -> Self {
        QueryGateway::new(kernel, wild_queries, gateway.query_timeout())
            .with_default_batch(gateway.default_batch)
            .with_interface_defaults(interface.defaults.clone())
    }

    pub fn with_interface_defaults(
        mut self,
        defaults: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        self.interface_defaults = defaults;
        self
    }

    pub fn with_default_batch(mut self, batch: usize) -> Self {
        self.default_batch = batch.max(1);
        self
    }

    pub fn limit(&self) -> Duration {
        self.guard.limit()
    }

    pub fn default_batch(&self) -> usize {
        self.default_batch
    }

    pub fn negative_cache(&self) -> &Arc<NegativeQueryCache> {
        &self.wild_queries
    }

    pub fn normalize(&self, form: &RenderForm) -> RenderOptions {
        form.normalize(&self.interface_defaults)
    }

    /// Batch size actually used for `request`
    pub fn batch_for(&self, request: &SearchRequest) -> usize {
        request
            .batch
            .filter(|b| *b > 0)
            .unwrap_or(self.default_batch)
    }

    /// Look up sections or tuples by coordinates. Not guarded, not cached.
    pub async fn run_table_query(&self, kind: TableKind, request: &TableRequest) -> ResponseEnvelope {
        let task = request.task.trim().to_string();
        if task.is_empty() {
            return ResponseEnvelope::empty();
        }

        let options = self.normalize(&request.form);
        let result = self
            .offload(move |kernel| kernel.table(kind, &task, &options))
            .await;

        match result {
            Ok(outcome) => ResponseEnvelope::from_table(outcome),
            Err(e) => {
                tracing::warn!(kind = kind.as_str(), error = %e, "table lookup failed");
                e.into_envelope()
            }
        }
    }

    /// Run a search under the deadline, consulting the negative cache first.
    pub async fn run_search(&self, request: &SearchRequest) -> ResponseEnvelope {
        if request.task.is_empty() {
            return ResponseEnvelope::no_results(request.form.result_kind());
        }

        let query = QueryId::from(request.task.as_str());
        let task = request.task.clone();
        let batch = self.batch_for(request);
        let offset = request.offset;
        let options = self.normalize(&request.form);

        let result = self
            .guarded(&query, move |kernel| {
                kernel.search(&task, batch, offset, &options)
            })
            .await;

        match result {
            Ok(outcome) => ResponseEnvelope::from_search(outcome),
            Err(e) => e.into_envelope(),
        }
    }

    /// Materialize CSV tables for a download, guarded like a search.
    ///
    /// A Kernel answer with `status == false` is a failure carrying the
    /// Kernel's messages.
    pub async fn run_csvs(&self, request: &DownloadRequest) -> Result<CsvOutcome, GatewayError> {
        let query = QueryId::from(request.query.as_str());
        let task = request.query.clone();
        let tuples = request.tuples.clone();
        let sections = request.sections.clone();
        let options = self.normalize(&request.form);

        let outcome = self
            .guarded(&query, move |kernel| {
                kernel.csvs(&task, &tuples, &sections, &options)
            })
            .await?;

        if outcome.status {
            Ok(outcome)
        } else {
            Err(GatewayError::KernelFailure {
                messages: outcome.messages,
            })
        }
    }

    /// Render a passage. Not guarded, not cached.
    pub async fn run_passage(
        &self,
        request: &PassageRequest,
    ) -> Result<PassageResponse, GatewayError> {
        let query = request.to_query();
        let selected = query.sec0.clone();
        let options = self.normalize(&request.form);

        let outcome = self
            .offload(move |kernel| kernel.passage(&query, &options))
            .await?;
        Ok(PassageResponse::from_outcome(outcome, &selected))
    }

    /// Fetch header, css, provenance and set names in one worker hop.
    pub async fn corpus_metadata(&self) -> Result<CorpusMetadata, GatewayError> {
        self.offload(|kernel| {
            Ok(CorpusMetadata::new(
                kernel.header()?,
                kernel.css()?,
                kernel.provenance()?,
                kernel.set_names()?,
            ))
        })
        .await
    }

    async fn guarded<T, F>(&self, query: &QueryId, call: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&dyn Kernel) -> KernelResult<T> + Send + 'static,
        T: Send + 'static,
    {
        if self.wild_queries.contains(query) {
            tracing::info!(task = %query, "query rejected by negative cache");
            return Err(GatewayError::CachedAbort {
                query: query.clone(),
                limit: self.limit(),
            });
        }

        let kernel = Arc::clone(&self.kernel);
        match self.guard.run(query, move || call(kernel.as_ref())).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(KernelError::TimedOut)) | Err(GuardError::TimedOut(_)) => {
                Err(self.record_timeout(query))
            }
            Ok(Err(e)) => {
                tracing::warn!(task = %query, error = %e, "kernel failure");
                Err(e.into())
            }
            Err(GuardError::Aborted { reason, .. }) => {
                tracing::error!(task = %query, reason = %reason, "kernel worker aborted");
                Err(GatewayError::kernel_failure(reason))
            }
        }
    }

    fn record_timeout(&self, query: &QueryId) -> GatewayError {
        self.wild_queries.add(query.clone());
        let err = GatewayError::TimedOut {
            query: query.clone(),
            limit: self.limit(),
        };
        tracing::error!(task = %query, limit_secs = self.limit().as_secs(), "{err}");
        err
    }

    async fn offload<T, F>(&self, call: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&dyn Kernel) -> KernelResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let kernel = Arc::clone(&self.kernel);
        match tokio::task::spawn_blocking(move || call(kernel.as_ref())).await {
            Ok(result) => result.map_err(GatewayError::from),
            Err(join_error) => Err(GatewayError::kernel_failure(join_error.to_string())),
        }
    }
}

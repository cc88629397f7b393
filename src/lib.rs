//! # Corpus Gateway
//!
//! Serves searches, section and tuple lookups, exports and downloads over a
//! corpus Kernel, with a wall-clock limit on every potentially unbounded
//! query and a negative cache of queries known to exceed it.
//!
//! ## Request Flow
//! ```text
//! HTTP request
//!     ↓
//! [protocol::rest]        → typed request (SearchRequest, TableRequest, ...)
//!     ↓
//! [gateway::QueryGateway] → negative cache check, TimeoutGuard, Kernel call
//!     ↓
//! ResponseEnvelope
//!     ↓
//! [encoder]               → interactive (with page links) or record encoding
//!     ↓
//! [export] / [download]   → export document, .tar.gz of CSV tables
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use corpus_gateway::{NegativeQueryCache, QueryGateway, RemoteKernel, SearchRequest};
//!
//! let kernel = Arc::new(RemoteKernel::new("http://127.0.0.1:18981", None)?);
//! let gateway = QueryGateway::new(kernel, Arc::new(NegativeQueryCache::new()), DEFAULT_QUERY_TIMEOUT);
//!
//! let envelope = gateway.run_search(&SearchRequest { task: "word sp=verb".into(), ..Default::default() }).await;
//! ```

pub mod config;
pub mod download;
pub mod encoder;
pub mod execution;
pub mod export;
pub mod gateway;
pub mod kernel;
pub mod metadata;
pub mod pagination;
pub mod protocol;

pub use config::Config;
pub use download::{ArchivePayload, DownloadArchiver};
pub use encoder::{Encoded, Encoding, InteractiveResponse, ResponseEncoder, ResultRecord};
pub use execution::{NegativeQueryCache, QueryId, TimeoutGuard, DEFAULT_QUERY_TIMEOUT};
pub use export::{ExportAssembler, ExportDocument, ExportRequest};
pub use gateway::{
    DownloadRequest, GatewayError, PassageRequest, QueryGateway, ResponseEnvelope, SearchRequest,
    TableRequest,
};
pub use kernel::{Kernel, KernelError, KernelResult, RemoteKernel};
pub use metadata::CorpusMetadata;
pub use pagination::{compute_pages, PageLink, PageLinkSet};

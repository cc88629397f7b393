//! Request Handler
//!
//! Process-wide state behind the HTTP routes: the gateway with its negative
//! cache, the encoder, the export and download assemblers, and counters for
//! the stats endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::download::{ArchivePayload, DownloadArchiver};
use crate::encoder::{Encoded, Encoding, ResponseEncoder};
use crate::execution::NegativeQueryCache;
use crate::export::{ExportAssembler, ExportDocument, ExportRequest};
use crate::gateway::{
    DownloadRequest, GatewayError, PassageRequest, PassageResponse, QueryGateway, SearchRequest,
    TableRequest,
};
use crate::kernel::{Kernel, TableKind};

pub struct Handler {
    gateway: Arc<QueryGateway>,
    encoder: ResponseEncoder,
    exporter: ExportAssembler,
    archiver: DownloadArchiver,
    start_time: Instant,
    request_count: AtomicU64,
}

impl Handler {
    pub fn new(gateway: Arc<QueryGateway>, app_name: &str, page_window: usize) -> Self {
        Handler {
            exporter: ExportAssembler::new(Arc::clone(&gateway), app_name),
            archiver: DownloadArchiver::new(Arc::clone(&gateway), app_name),
            encoder: ResponseEncoder::new(page_window),
            gateway,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Wire a fresh negative cache and gateway around `kernel`.
    pub fn from_config(config: &Config, kernel: Arc<dyn Kernel>) -> Self {
        let gateway = QueryGateway::from_config(
            kernel,
            Arc::new(NegativeQueryCache::new()),
            &config.gateway,
            &config.interface,
        );
        Handler::new(
            Arc::new(gateway),
            &config.gateway.app_name,
            config.gateway.page_window,
        )
    }

    pub fn gateway(&self) -> &Arc<QueryGateway> {
        &self.gateway
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn total_requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    fn count_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn search(&self, request: &SearchRequest, encoding: Encoding) -> Encoded {
        self.count_request();
        let envelope = self.gateway.run_search(request).await;
        let batch = self.gateway.batch_for(request);
        self.encoder.encode(&envelope, encoding, Some(batch))
    }

    /// Table lookups are never paged.
    pub async fn table(
        &self,
        kind: TableKind,
        request: &TableRequest,
        encoding: Encoding,
    ) -> Encoded {
        self.count_request();
        let envelope = self.gateway.run_table_query(kind, request).await;
        self.encoder.encode(&envelope, encoding, None)
    }

    pub async fn passage(&self, request: &PassageRequest) -> Result<PassageResponse, GatewayError> {
        self.count_request();
        self.gateway.run_passage(request).await
    }

    pub async fn export(&self, request: &ExportRequest) -> Result<ExportDocument, GatewayError> {
        self.count_request();
        self.exporter.build_export(request).await
    }

    pub async fn download(&self, request: &DownloadRequest) -> Result<ArchivePayload, GatewayError> {
        self.count_request();
        self.archiver.build_archive(request).await
    }
}

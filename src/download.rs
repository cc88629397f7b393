//! Download Archives
//!
//! Materializes sections, tuples and query results as CSV files, adds an
//! `about.md` with corpus metadata and the user's description, and packs
//! everything into one gzip-compressed tar archive held in memory.
//!
//! The CSV step is guarded like a search: a cached or fresh timeout aborts
//! before any archive work starts, so no partial archive is ever produced.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Local};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::gateway::{DownloadRequest, GatewayError, QueryGateway};
use crate::kernel::{CsvOutcome, CsvTable};
use crate::metadata::CorpusMetadata;

/// Name of the metadata file inside every archive
pub const ABOUT_FILE: &str = "about.md";

/// A finished archive ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ArchivePayload {
    /// Response headers for sending the archive as an attachment
    pub fn headers(&self) -> [(&'static str, String); 4] {
        [
            ("Expires", "0".to_string()),
            (
                "Cache-Control",
                "no-cache, no-store, must-revalidate".to_string(),
            ),
            ("Content-Type", "application/octet-stream".to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.file_name),
            ),
        ]
    }
}

pub struct DownloadArchiver {
    gateway: Arc<QueryGateway>,
    app_name: String,
}

impl DownloadArchiver {
    pub fn new(gateway: Arc<QueryGateway>, app_name: impl Into<String>) -> Self {
        DownloadArchiver {
            gateway,
            app_name: app_name.into(),
        }
    }

    pub async fn build_archive(&self, request: &DownloadRequest) -> Result<ArchivePayload, GatewayError> {
        let outcome = self.gateway.run_csvs(request).await?;
        let metadata = self.gateway.corpus_metadata().await?;

        let payload = assemble_archive(
            &self.app_name,
            &outcome,
            &metadata,
            &request.description,
            Local::now(),
        )?;
        tracing::info!(
            file = %payload.file_name,
            size = payload.bytes.len(),
            "download archive built"
        );
        Ok(payload)
    }
}

/// Pack CSV tables and `about.md` into a `.tar.gz` named after `app_name`
/// and `now`.
pub fn assemble_archive(
    app_name: &str,
    outcome: &CsvOutcome,
    metadata: &CorpusMetadata,
    description: &str,
    now: DateTime<Local>,
) -> Result<ArchivePayload, GatewayError> {
    let file_name = format!("{app_name}-{}.tar.gz", now.format("%Y%m%dT%H%M%S"));

    let mut entries = vec![(
        ABOUT_FILE.to_string(),
        about_markdown(metadata, description).into_bytes(),
    )];
    let tables = outcome
        .csvs
        .iter()
        .chain(outcome.tuple_results.iter())
        .chain(outcome.query_results.iter());
    for table in tables {
        entries.push((format!("{}.csv", table.name), table_to_csv(table).into_bytes()));
    }

    let bytes = write_tar_gz(&entries, now.timestamp()).map_err(|e| GatewayError::Archive(e.to_string()))?;
    Ok(ArchivePayload { file_name, bytes })
}

/// Contents of `about.md`
pub fn about_markdown(metadata: &CorpusMetadata, description: &str) -> String {
    let mut md = String::new();
    md.push_str(&metadata.colofon);
    md.push_str("\n\n");
    md.push_str(&metadata.header);
    md.push_str("\n\n# Provenance\n\n");
    md.push_str(&metadata.provenance_markdown());
    if !description.trim().is_empty() {
        md.push_str("\n# Description\n\n");
        md.push_str(description);
        md.push('\n');
    }
    md
}

/// Serialize rows, quoting fields that need it
pub fn table_to_csv(table: &CsvTable) -> String {
    let mut out = String::new();
    for row in &table.rows {
        let line = row
            .iter()
            .map(|field| escape_csv_field(field))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_tar_gz(entries: &[(String, Vec<u8>)], mtime: i64) -> std::io::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(u64::try_from(mtime).unwrap_or(0));
        builder.append_data(&mut header, name, data.as_slice())?;
    }

    let mut encoder = builder.into_inner()?;
    encoder.flush()?;
    encoder.finish()
}

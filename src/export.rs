//! Export Assembly
//!
//! Builds a self-contained document from the current sections, tuples and
//! query results plus corpus metadata. Each slot shows the Kernel's
//! messages instead of its table when that query had messages or produced
//! no table. The export only fails when all three queries failed; missing
//! metadata leaves the colofon and provenance blank.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::encoder::{ResponseEncoder, ResultRecord};
use crate::gateway::{GatewayError, QueryGateway, SearchRequest, TableRequest};
use crate::kernel::TableKind;
use crate::metadata::CorpusMetadata;

/// Inputs of one export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    pub sections: TableRequest,
    pub tuples: TableRequest,
    pub query: SearchRequest,
    /// User-written description, kept verbatim
    pub description: String,
}

/// The displayed content of each slot after message substitution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportTables {
    pub sections: String,
    pub tuples: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecords {
    pub sections: ResultRecord,
    pub tuples: ResultRecord,
    pub query: ResultRecord,
}

/// A finished export page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub app_name: String,
    pub css: String,
    pub description: String,
    pub colofon: String,
    pub header: String,
    /// Provenance as an HTML list
    pub provenance: String,
    /// `Sets: ...` paragraph, absent without custom sets
    pub set_names: Option<String>,
    pub tables: ExportTables,
    pub records: ExportRecords,
}

pub struct ExportAssembler {
    gateway: Arc<QueryGateway>,
    encoder: ResponseEncoder,
    app_name: String,
}

impl ExportAssembler {
    pub fn new(gateway: Arc<QueryGateway>, app_name: impl Into<String>) -> Self {
        ExportAssembler {
            gateway,
            encoder: ResponseEncoder::default(),
            app_name: app_name.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Run the three queries and the metadata fetch concurrently and merge
    /// them into one document.
    pub async fn build_export(&self, request: &ExportRequest) -> Result<ExportDocument, GatewayError> {
        let (sections, tuples, query, metadata) = tokio::join!(
            self.gateway.run_table_query(TableKind::Sections, &request.sections),
            self.gateway.run_table_query(TableKind::Tuples, &request.tuples),
            self.gateway.run_search(&request.query),
            self.gateway.corpus_metadata(),
        );

        if sections.is_failure() && tuples.is_failure() && query.is_failure() {
            let messages = [sections, tuples, query]
                .into_iter()
                .flat_map(|env| env.messages)
                .collect();
            return Err(GatewayError::AllQueriesFailed { messages });
        }

        let metadata = metadata.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "corpus metadata unavailable, exporting without it");
            CorpusMetadata::default()
        });
        let records = ExportRecords {
            sections: self.encoder.record(&sections),
            tuples: self.encoder.record(&tuples),
            query: self.encoder.record(&query),
        };
        let tables = ExportTables {
            sections: slot_content(&records.sections),
            tuples: slot_content(&records.tuples),
            query: slot_content(&records.query),
        };

        tracing::debug!(
            sections_ok = records.sections.status,
            tuples_ok = records.tuples.status,
            query_ok = records.query.status,
            "export assembled"
        );

        Ok(ExportDocument {
            app_name: self.app_name.clone(),
            css: metadata.css.clone(),
            description: request.description.clone(),
            colofon: metadata.colofon.clone(),
            header: metadata.header.clone(),
            provenance: metadata.provenance_html(),
            set_names: metadata.set_names_html(),
            tables,
            records,
        })
    }
}

fn slot_content(record: &ResultRecord) -> String {
    match &record.table {
        Some(table) if record.messages.is_empty() => table.clone(),
        _ => record.messages.clone(),
    }
}

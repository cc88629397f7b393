//! Response Envelope
//!
//! The uniform result of every gateway operation.

use serde::{Deserialize, Serialize};

use crate::kernel::{Message, SearchOutcome, TableOutcome};

use super::error::GatewayError;

/// Result kind used in the empty-query placeholder
pub const DEFAULT_RESULT_KIND: &str = "result";

/// Content, status and diagnostics of one gateway call.
///
/// Invariant: `status == false` implies `table == None`. The constructors
/// are the only places that build envelopes from Kernel output, and they
/// uphold it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub table: Option<String>,
    pub status: bool,
    pub messages: Vec<Message>,
    pub features: Option<String>,
    /// Offset of the first result in `table`
    pub start: usize,
    /// Total number of results of the query
    pub total: usize,
}

impl ResponseEnvelope {
    /// Nothing was asked, so nothing failed.
    pub fn empty() -> Self {
        ResponseEnvelope {
            status: true,
            ..Default::default()
        }
    }

    /// Placeholder for an empty search, e.g. `no results`.
    pub fn no_results(result_kind: &str) -> Self {
        ResponseEnvelope {
            table: Some(format!("no {result_kind}s")),
            status: true,
            ..Default::default()
        }
    }

    pub fn failed(messages: Vec<Message>) -> Self {
        ResponseEnvelope {
            table: None,
            status: false,
            messages,
            ..Default::default()
        }
    }

    pub fn from_search(outcome: SearchOutcome) -> Self {
        let SearchOutcome {
            content,
            status,
            messages,
            features,
            start,
            total,
        } = outcome;

        if !status {
            return ResponseEnvelope::failed(GatewayError::KernelFailure { messages }.messages());
        }

        ResponseEnvelope {
            table: content,
            status,
            messages,
            features,
            start,
            total,
        }
    }

    /// Table lookups succeed unless the Kernel produced messages.
    pub fn from_table(outcome: TableOutcome) -> Self {
        let status = outcome.messages.is_empty();
        ResponseEnvelope {
            table: if status { outcome.content } else { None },
            status,
            messages: outcome.messages,
            ..Default::default()
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.status
    }
}

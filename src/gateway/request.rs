//! Inbound request records and their normalization into Kernel options.
//!
//! Field names follow the browser form; parsing the form itself happens in
//! the routing layer.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::kernel::{PassageQuery, RenderOptions};

use super::envelope::DEFAULT_RESULT_KIND;

/// Display options shared by all requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderForm {
    pub features: String,
    /// Comma-separated list of expanded rows
    pub opened: String,
    pub text_format: String,
    pub base_types: Vec<String>,
    pub hidden_types: Vec<String>,
    pub condensed: bool,
    pub condense_type: String,
    pub getx: Option<u64>,
    /// Values for interface options; only options with a configured default
    /// are honoured
    pub options: BTreeMap<String, serde_json::Value>,
}

impl RenderForm {
    /// Turn raw form values into Kernel render options.
    ///
    /// Interface options start from `defaults` (entries with a `null`
    /// default are disabled) and are overridden by non-null request values.
    pub fn normalize(&self, defaults: &BTreeMap<String, serde_json::Value>) -> RenderOptions {
        let interface = defaults
            .iter()
            .filter(|(_, default)| !default.is_null())
            .map(|(key, default)| {
                let value = self
                    .options
                    .get(key)
                    .filter(|v| !v.is_null())
                    .unwrap_or(default);
                (key.clone(), value.clone())
            })
            .collect();

        RenderOptions {
            features: self.features.trim().to_string(),
            opened: parse_opened(&self.opened),
            text_format: non_empty(&self.text_format),
            base_types: self.base_types.clone(),
            hidden_types: self.hidden_types.clone(),
            condensed: self.condensed,
            condense_type: non_empty(&self.condense_type),
            getx: self.getx,
            interface,
        }
    }

    /// What one search result is called: `result`, or the condense type
    /// when results are condensed.
    pub fn result_kind(&self) -> &str {
        let condense_type = self.condense_type.trim();
        if self.condensed && !condense_type.is_empty() {
            condense_type
        } else {
            DEFAULT_RESULT_KIND
        }
    }
}

/// Parse `"1, 4,x,7"` into `{1, 4, 7}`; unparseable items are dropped.
pub fn parse_opened(raw: &str) -> BTreeSet<u64> {
    raw.split(',')
        .filter_map(|item| item.trim().parse().ok())
        .collect()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Section or tuple lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRequest {
    pub task: String,
    #[serde(flatten)]
    pub form: RenderForm,
}

/// Search query with paging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// The search template; its exact text is the query identity
    pub task: String,
    /// Results per page; the configured default when absent or zero
    pub batch: Option<usize>,
    /// Offset of the first result to show
    #[serde(alias = "position")]
    pub offset: usize,
    #[serde(flatten)]
    pub form: RenderForm,
}

/// Passage lookup by section coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassageRequest {
    pub sec0: String,
    pub sec1: String,
    pub sec2: String,
    /// Query whose results are highlighted in the passage
    pub query: String,
    #[serde(flatten)]
    pub form: RenderForm,
}

impl PassageRequest {
    pub fn to_query(&self) -> PassageQuery {
        PassageQuery {
            sec0: self.sec0.trim().to_string(),
            sec1: non_empty(&self.sec1),
            sec2: non_empty(&self.sec2),
            query: self.query.clone(),
            // Passage rows are addressed by name, not number
            opened: self
                .form
                .opened
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// CSV download of sections, tuples and query results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadRequest {
    pub query: String,
    pub tuples: String,
    pub sections: String,
    /// User-written description added to the archive
    pub description: String,
    #[serde(flatten)]
    pub form: RenderForm,
}

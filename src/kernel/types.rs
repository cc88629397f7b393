//! Kernel Data Types
//!
//! Values exchanged with the corpus Kernel. They are plain serde records so
//! that the remote adapter can ship them as JSON unchanged.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a Kernel message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A user-facing diagnostic attached to a result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Message {
            severity,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Message::new(Severity::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Message::new(Severity::Warning, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Message::new(Severity::Info, text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.as_str(), self.text)
    }
}

/// The two coordinate-addressed table kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Sections,
    Tuples,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Sections => "sections",
            TableKind::Tuples => "tuples",
        }
    }
}

impl std::str::FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sections" => Ok(TableKind::Sections),
            "tuples" => Ok(TableKind::Tuples),
            other => Err(format!("Unknown table kind: {other}")),
        }
    }
}

/// Normalized rendering options passed to every Kernel call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Extra features to show in results
    pub features: String,
    /// Result rows the user has expanded
    pub opened: BTreeSet<u64>,
    pub text_format: Option<String>,
    pub base_types: Vec<String>,
    pub hidden_types: Vec<String>,
    pub condensed: bool,
    pub condense_type: Option<String>,
    /// Render only this result row (when set)
    pub getx: Option<u64>,
    /// Interface options (defaults merged with request values)
    pub interface: BTreeMap<String, serde_json::Value>,
}

/// Raw result of `Kernel::search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub content: Option<String>,
    pub status: bool,
    pub messages: Vec<Message>,
    pub features: Option<String>,
    pub start: usize,
    pub total: usize,
}

/// Raw result of `Kernel::table`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableOutcome {
    pub content: Option<String>,
    pub messages: Vec<Message>,
}

/// Section coordinates for a passage lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageQuery {
    pub sec0: String,
    pub sec1: Option<String>,
    pub sec2: Option<String>,
    /// Query whose results should be highlighted in the passage
    pub query: String,
    /// Passages the user has expanded
    pub opened: BTreeSet<String>,
}

/// Raw result of `Kernel::passage`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassageOutcome {
    pub content: Option<String>,
    /// Node type of the top-level section (e.g. `book`)
    pub section_type: String,
    /// Navigable top-level section names
    pub passages: Vec<String>,
    /// Section level at which browsing navigates
    pub nav_level: u8,
}

/// A table rendered as rows of cells, ready for CSV serialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    /// File stem inside the archive
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Raw result of `Kernel::csvs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvOutcome {
    pub status: bool,
    pub messages: Vec<Message>,
    /// Section and tuple tables plus per-node-type query tables
    pub csvs: Vec<CsvTable>,
    pub tuple_results: Option<CsvTable>,
    pub query_results: Option<CsvTable>,
}

/// Corpus header block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusHeader {
    pub colofon: String,
    pub header: String,
    pub app_logo: String,
    pub tf_logo: String,
}

/// One data module the corpus is built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    pub corpus: String,
    pub version: String,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
}

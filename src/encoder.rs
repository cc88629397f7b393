//! Response Encoding
//!
//! Turns a `ResponseEnvelope` into what a caller displays or reuses:
//! - interactive: table, status, messages, features and page links
//! - record: the same fields without page links, for composite documents
//!
//! Both encodings apply the same rule: when there are messages, they are
//! shown in place of a non-null table. A null table stays null.

use serde::{Deserialize, Serialize};

use crate::gateway::ResponseEnvelope;
use crate::kernel::Message;
use crate::pagination::{compute_pages, PageLinkSet};

/// Which encoding a caller wants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Interactive,
    Record,
}

/// Fragment for direct display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractiveResponse {
    pub pages: PageLinkSet,
    pub table: Option<String>,
    pub n_results: usize,
    pub status: bool,
    pub messages: String,
    pub features: Option<String>,
}

/// Plain record for reuse by downstream assemblers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub table: Option<String>,
    pub status: bool,
    pub messages: String,
    pub features: Option<String>,
    pub start: usize,
    pub total: usize,
}

/// Either encoding, serialized without a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Encoded {
    Interactive(InteractiveResponse),
    Record(ResultRecord),
}

/// Stateless encoder; `page_window` limits the number of page links
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEncoder {
    page_window: usize,
}

impl ResponseEncoder {
    pub fn new(page_window: usize) -> Self {
        ResponseEncoder { page_window }
    }

    /// Interactive encoding. `batch` is the page size of a paged search;
    /// page links are only produced for successful searches with a table.
    pub fn interactive(&self, envelope: &ResponseEnvelope, batch: Option<usize>) -> InteractiveResponse {
        let pages = match batch {
            Some(batch) if envelope.status && envelope.table.is_some() => {
                compute_pages(envelope.total, envelope.start, batch).windowed(self.page_window)
            }
            _ => PageLinkSet::default(),
        };

        InteractiveResponse {
            pages,
            table: displayed_table(envelope),
            n_results: envelope.total,
            status: envelope.status,
            messages: render_messages(&envelope.messages),
            features: envelope.features.clone(),
        }
    }

    pub fn record(&self, envelope: &ResponseEnvelope) -> ResultRecord {
        ResultRecord {
            table: displayed_table(envelope),
            status: envelope.status,
            messages: render_messages(&envelope.messages),
            features: envelope.features.clone(),
            start: envelope.start,
            total: envelope.total,
        }
    }

    pub fn encode(
        &self,
        envelope: &ResponseEnvelope,
        encoding: Encoding,
        batch: Option<usize>,
    ) -> Encoded {
        match encoding {
            Encoding::Interactive => Encoded::Interactive(self.interactive(envelope, batch)),
            Encoding::Record => Encoded::Record(self.record(envelope)),
        }
    }
}

/// Messages shadow content; a null table stays null.
pub fn displayed_table(envelope: &ResponseEnvelope) -> Option<String> {
    match &envelope.table {
        None => None,
        Some(_) if !envelope.messages.is_empty() => Some(render_messages(&envelope.messages)),
        Some(table) => Some(table.clone()),
    }
}

/// Messages as HTML spans, one per line. Empty input gives an empty string.
pub fn render_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| {
            format!(
                r#"<span class="{}">{}</span>"#,
                m.severity.as_str(),
                escape_html(&m.text)
            )
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

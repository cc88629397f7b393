//! Corpus metadata shared by export pages and download archives.

use serde::Serialize;

use crate::encoder::escape_html;
use crate::kernel::{CorpusHeader, ProvenanceEntry};

/// Header, styling and provenance of the served corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusMetadata {
    /// Colofon framed by the app and engine logos
    pub colofon: String,
    pub header: String,
    pub css: String,
    pub provenance: Vec<ProvenanceEntry>,
    pub set_names: Vec<String>,
}

impl CorpusMetadata {
    pub fn new(
        header: CorpusHeader,
        css: String,
        provenance: Vec<ProvenanceEntry>,
        set_names: Vec<String>,
    ) -> Self {
        CorpusMetadata {
            colofon: format!("{}{}{}", header.app_logo, header.colofon, header.tf_logo),
            header: header.header,
            css,
            provenance,
            set_names,
        }
    }

    /// `Sets: a, b` paragraph, or `None` when no custom sets are loaded
    pub fn set_names_html(&self) -> Option<String> {
        if self.set_names.is_empty() {
            return None;
        }
        let names = escape_html(&self.set_names.join(", "));
        Some(format!(
            r#"<p class="setnames">Sets: <span class="setnames">{names}</span></p>"#
        ))
    }

    pub fn provenance_html(&self) -> String {
        let mut html = String::from(r#"<ul class="provenance">"#);
        for entry in &self.provenance {
            html.push_str("<li><b>");
            html.push_str(&escape_html(&entry.corpus));
            html.push_str("</b> ");
            html.push_str(&escape_html(&entry.version));
            if let Some(release) = &entry.release {
                html.push_str(&format!(" (release {})", escape_html(release)));
            }
            if let Some(doi) = &entry.doi {
                let doi = escape_html(doi);
                html.push_str(&format!(r#" <a href="https://doi.org/{doi}">{doi}</a>"#));
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
        html
    }

    pub fn provenance_markdown(&self) -> String {
        let mut md = String::new();
        for entry in &self.provenance {
            md.push_str(&format!("* **{}** {}", entry.corpus, entry.version));
            if let Some(release) = &entry.release {
                md.push_str(&format!(" (release {release})"));
            }
            if let Some(doi) = &entry.doi {
                md.push_str(&format!(" [{doi}](https://doi.org/{doi})"));
            }
            md.push('\n');
        }
        if !self.set_names.is_empty() {
            md.push_str(&format!("\nSets: {}\n", self.set_names.join(", ")));
        }
        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CorpusMetadata {
        CorpusMetadata::new(
            CorpusHeader {
                colofon: "<span>BHSA</span>".to_string(),
                header: "<h1>BHSA</h1>".to_string(),
                app_logo: "[app]".to_string(),
                tf_logo: "[tf]".to_string(),
            },
            ".x{}".to_string(),
            vec![ProvenanceEntry {
                corpus: "etcbc/bhsa".to_string(),
                version: "2021".to_string(),
                release: Some("v1.8".to_string()),
                doi: Some("10.5281/zenodo.1007624".to_string()),
            }],
            vec![],
        )
    }

    #[test]
    fn test_colofon_framed_by_logos() {
        assert_eq!(sample().colofon, "[app]<span>BHSA</span>[tf]");
    }

    #[test]
    fn test_set_names_absent_when_empty() {
        assert_eq!(sample().set_names_html(), None);
    }

    #[test]
    fn test_set_names_listed() {
        let mut meta = sample();
        meta.set_names = vec!["clauses".to_string(), "heroes".to_string()];
        let html = meta.set_names_html().unwrap();
        assert!(html.contains("Sets: <span class=\"setnames\">clauses, heroes</span>"));
        assert!(meta.provenance_markdown().contains("Sets: clauses, heroes"));
    }

    #[test]
    fn test_provenance_renderings() {
        let meta = sample();
        let html = meta.provenance_html();
        assert!(html.contains("<b>etcbc/bhsa</b> 2021 (release v1.8)"));
        assert!(html.contains("https://doi.org/10.5281/zenodo.1007624"));

        let md = meta.provenance_markdown();
        assert!(md.starts_with("* **etcbc/bhsa** 2021 (release v1.8)"));
    }
}

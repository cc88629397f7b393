//! Passage browsing results.

use serde::{Deserialize, Serialize};

use crate::kernel::PassageOutcome;

/// One navigable top-level section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageLink {
    pub section: String,
    pub is_current: bool,
}

/// A rendered passage plus the links to its sibling sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageResponse {
    pub table: Option<String>,
    pub section_type: String,
    pub nav_level: u8,
    pub passages: Vec<PassageLink>,
}

impl PassageResponse {
    /// Mark the section named `selected` among the Kernel's passages.
    pub fn from_outcome(outcome: PassageOutcome, selected: &str) -> Self {
        let passages = outcome
            .passages
            .into_iter()
            .map(|section| PassageLink {
                is_current: section == selected,
                section,
            })
            .collect();

        PassageResponse {
            table: outcome.content,
            section_type: outcome.section_type,
            nav_level: outcome.nav_level,
            passages,
        }
    }
}

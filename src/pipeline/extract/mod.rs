//! Record recovery from arbitrary partner-listing pages.
//!
//! Tactics run in a fixed order and the first one that produces any record
//! wins; later tactics never supplement an earlier result. Missing elements
//! degrade to empty strings, so extraction itself cannot fail.

pub mod tactics;
pub mod text;

use scraper::Html;
use std::fmt;

use crate::types::RawRecord;

/// Which tactic produced a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tactic {
    Table,
    /// Carries the container selector that matched
    Container(&'static str),
    TextBlocks,
}

impl Tactic {
    pub fn label(&self) -> &'static str {
        match self {
            Tactic::Table => "table",
            Tactic::Container(_) => "container",
            Tactic::TextBlocks => "text_blocks",
        }
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tactic::Container(selector) => write!(f, "container '{}'", selector),
            other => f.write_str(other.label()),
        }
    }
}

/// Outcome of one tactic. `Found` always holds at least one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found {
        tactic: Tactic,
        records: Vec<RawRecord>,
    },
    NotFound,
}

impl Extraction {
    pub fn found(tactic: Tactic, records: Vec<RawRecord>) -> Self {
        if records.is_empty() {
            Extraction::NotFound
        } else {
            Extraction::Found { tactic, records }
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found { .. })
    }

    pub fn tactic(&self) -> Option<Tactic> {
        match self {
            Extraction::Found { tactic, .. } => Some(*tactic),
            Extraction::NotFound => None,
        }
    }

    pub fn into_records(self) -> Vec<RawRecord> {
        match self {
            Extraction::Found { records, .. } => records,
            Extraction::NotFound => Vec::new(),
        }
    }
}

pub type TacticFn = fn(&Html) -> Extraction;

/// Priority order of the cascade
pub const TACTICS: [TacticFn; 3] = [tactics::table, tactics::containers, tactics::text_blocks];

/// Runs the cascade, stopping at the first tactic that finds anything.
pub fn extract(document: &Html) -> Extraction {
    TACTICS
        .iter()
        .map(|tactic| tactic(document))
        .find(Extraction::is_found)
        .unwrap_or(Extraction::NotFound)
}

/// Parses a page body and runs the cascade on it.
pub fn extract_html(body: &str) -> Extraction {
    extract(&Html::parse_document(body))
}

/// Text of the page `<title>`, if the page has one.
pub fn page_title(document: &Html) -> Option<String> {
    let selector = scraper::Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(text::inline_text)
}

use metrics::counter;
use scraper::Html;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

use crate::app::ports::PageFetcher;
use crate::config::{Config, SourceConfig};
use crate::infra::table_store::CsvTableStore;
use crate::pipeline::extract::{self, Extraction};
use crate::types::{IntermediateTable, Source};

/// What happened to one source during a scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScrapeStatus {
    /// No url configured; the table is supplied by something else
    NotScraped,
    FetchFailed { reason: String },
    /// The page was fetched but no tactic recovered a record
    NoRecords,
    WriteFailed { reason: String },
    Saved {
        tactic: String,
        records: usize,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOutcome {
    pub source: Source,
    #[serde(flatten)]
    pub status: ScrapeStatus,
}

impl ScrapeOutcome {
    pub fn records(&self) -> usize {
        match &self.status {
            ScrapeStatus::Saved { records, .. } => *records,
            _ => 0,
        }
    }
}

/// Fetch, extract and persist one intermediate table per configured source.
pub struct ScrapeUseCase {
    fetcher: Box<dyn PageFetcher>,
    store: CsvTableStore,
}

impl ScrapeUseCase {
    pub fn new(fetcher: Box<dyn PageFetcher>, store: CsvTableStore) -> Self {
        Self { fetcher, store }
    }

    /// Scrapes the requested sources one after another, in the order given.
    /// A failing source never stops the others.
    pub async fn run(&self, config: &Config, sources: &[Source]) -> Vec<ScrapeOutcome> {
        let mut outcomes = Vec::with_capacity(sources.len());
        for &source in sources {
            let status = match config.source(source) {
                Some(source_config) => self.scrape_source(config, source_config).await,
                None => {
                    warn!("Source {} is not configured, skipping", source);
                    ScrapeStatus::NotScraped
                }
            };
            outcomes.push(ScrapeOutcome { source, status });
        }
        outcomes
    }

    #[instrument(skip(self, config, source_config), fields(source = %source_config.id))]
    pub async fn scrape_source(&self, config: &Config, source_config: &SourceConfig) -> ScrapeStatus {
        let source = source_config.id;
        let Some(request) = config.fetch_request(source_config) else {
            info!("No url configured for {}, expecting an externally supplied table", source);
            return ScrapeStatus::NotScraped;
        };

        info!("Fetching: {}", request.url);
        let body = match self.fetcher.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to fetch {}: {}", request.url, e);
                counter!("bank_partners_fetch_failures_total", "source" => source.id()).increment(1);
                self.discard_stale_table(source);
                return ScrapeStatus::FetchFailed {
                    reason: e.to_string(),
                };
            }
        };

        let extraction = extract_page(&body);
        let Extraction::Found { tactic, records } = extraction else {
            warn!("No records extracted from {}; nothing saved", request.url);
            self.discard_stale_table(source);
            return ScrapeStatus::NoRecords;
        };

        info!("Extracted {} records via {}", records.len(), tactic);
        counter!(
            "bank_partners_records_extracted_total",
            "source" => source.id(),
            "tactic" => tactic.label()
        )
        .increment(records.len() as u64);

        let table = IntermediateTable::from_records(records);
        match self.store.write_intermediate(source, &table) {
            Ok(path) => {
                info!("Saved {} records to {}", table.len(), path.display());
                ScrapeStatus::Saved {
                    tactic: tactic.to_string(),
                    records: table.len(),
                    path,
                }
            }
            Err(e) => {
                error!("Failed to save {} table: {}", source, e);
                ScrapeStatus::WriteFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// A source that was scraped and came back empty contributes zero rows,
    /// so a table left by an earlier run must not be combined.
    fn discard_stale_table(&self, source: Source) {
        match self.store.remove_table(source) {
            Ok(true) => warn!("Removed stale {} from an earlier run", source.file_name()),
            Ok(false) => {}
            Err(e) => error!("Failed to remove stale {}: {}", source.file_name(), e),
        }
    }
}

/// Parses the body, logs the page title and runs the extraction cascade.
fn extract_page(body: &str) -> Extraction {
    let document = Html::parse_document(body);
    let title = extract::page_title(&document);
    info!("Page title: {}", title.as_deref().unwrap_or("N/A"));

    let extraction = extract::extract(&document);
    if matches!(extraction.tactic(), Some(extract::Tactic::TextBlocks)) {
        warn!("No structured partner data found, fell back to text block extraction");
    }
    extraction
}

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::infra::table_store::CsvTableStore;
use crate::pipeline::normalize::registry::NormalizationRegistry;
use crate::pipeline::normalize::normalizers::SourceNormalizer;
use crate::pipeline::normalize::CanonicalRow;
use crate::types::Source;

/// Per-source contribution to the unified table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: Source,
    pub tag: &'static str,
    pub rows: usize,
    /// The intermediate table was absent or unreadable
    pub missing: bool,
}

/// Canonical rows of every source, concatenated in assembly order
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    pub rows: Vec<CanonicalRow>,
    pub counts: Vec<SourceCount>,
}

impl UnifiedTable {
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Diagnostic summary of a combine run; not part of the output file.
#[derive(Debug, Clone, Serialize)]
pub struct CombineSummary {
    pub output_file: PathBuf,
    pub total_rows: usize,
    pub per_source: Vec<SourceCount>,
    pub finished_at: DateTime<Utc>,
}

impl CombineSummary {
    pub fn missing_sources(&self) -> Vec<Source> {
        self.per_source
            .iter()
            .filter(|c| c.missing)
            .map(|c| c.source)
            .collect()
    }
}

/// Normalizes every source's intermediate table into the unified table.
pub struct CombineUseCase {
    registry: NormalizationRegistry,
    store: CsvTableStore,
}

impl CombineUseCase {
    pub fn new(registry: NormalizationRegistry, store: CsvTableStore) -> Self {
        Self { registry, store }
    }

    pub fn with_default_registry(store: CsvTableStore) -> Self {
        Self::new(NormalizationRegistry::new(), store)
    }

    /// Reads and maps every source in registry order. Missing or unreadable
    /// tables contribute zero rows and a warning.
    pub fn assemble(&self) -> UnifiedTable {
        let mut unified = UnifiedTable::default();

        for normalizer in self.registry.normalizers() {
            let source = normalizer.source();
            let (rows, missing) = self.normalize_source(normalizer);

            counter!("bank_partners_rows_normalized_total", "source" => source.id())
                .increment(rows.len() as u64);
            unified.counts.push(SourceCount {
                source,
                tag: source.tag(),
                rows: rows.len(),
                missing,
            });
            unified.rows.extend(rows);
        }
        unified
    }

    fn normalize_source(&self, normalizer: &dyn SourceNormalizer) -> (Vec<CanonicalRow>, bool) {
        let source = normalizer.source();
        match self.store.read_source_rows(source) {
            Ok(Some(rows)) => (
                rows.iter().map(|row| normalizer.to_canonical(row)).collect(),
                false,
            ),
            Ok(None) => {
                warn!(
                    "{} not found in {}, skipping",
                    source.file_name(),
                    self.store.data_dir().display()
                );
                counter!("bank_partners_missing_sources_total", "source" => source.id()).increment(1);
                (Vec::new(), true)
            }
            Err(e) => {
                warn!("Could not read {}: {}, skipping", source.file_name(), e);
                counter!("bank_partners_missing_sources_total", "source" => source.id()).increment(1);
                (Vec::new(), true)
            }
        }
    }

    /// Assembles the unified table and writes it to `output`.
    #[instrument(skip(self, output), fields(output = %output.display()))]
    pub fn run(&self, output: &Path) -> Result<CombineSummary> {
        let unified = self.assemble();
        self.store.write_unified(output, &unified.rows)?;

        info!("{} written with {} total rows", output.display(), unified.total_rows());
        Ok(CombineSummary {
            output_file: output.to_path_buf(),
            total_rows: unified.total_rows(),
            per_source: unified.counts,
            finished_at: Utc::now(),
        })
    }
}

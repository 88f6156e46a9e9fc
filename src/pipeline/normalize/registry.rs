use super::normalizers::{
    AbbHomeNormalizer, BirBankNormalizer, PashaBankNormalizer, SourceNormalizer,
    XalqBankNormalizer,
};
use super::{CanonicalRow, SourceRow};
use crate::types::Source;

/// Source-specific normalizers in assembly order
pub struct NormalizationRegistry {
    normalizers: Vec<Box<dyn SourceNormalizer>>,
}

impl NormalizationRegistry {
    /// Create a registry with the built-in normalizers, one per `Source::ALL` entry
    pub fn new() -> Self {
        let normalizers: Vec<Box<dyn SourceNormalizer>> = Source::ALL
            .into_iter()
            .map(|source| -> Box<dyn SourceNormalizer> {
                match source {
                    Source::PashaBank => Box::new(PashaBankNormalizer),
                    Source::AbbHome => Box::new(AbbHomeNormalizer),
                    Source::XalqBank => Box::new(XalqBankNormalizer),
                    Source::BirBank => Box::new(BirBankNormalizer),
                }
            })
            .collect();

        Self { normalizers }
    }

    /// Get the normalizer for a source
    pub fn get_normalizer(&self, source: Source) -> Option<&dyn SourceNormalizer> {
        self.normalizers
            .iter()
            .find(|n| n.source() == source)
            .map(|n| n.as_ref())
    }

    /// Normalizers in the order their rows appear in the unified table
    pub fn normalizers(&self) -> impl Iterator<Item = &dyn SourceNormalizer> {
        self.normalizers.iter().map(|n| n.as_ref())
    }

    pub fn list_sources(&self) -> Vec<Source> {
        self.normalizers.iter().map(|n| n.source()).collect()
    }

    pub fn normalize(&self, source: Source, row: &SourceRow) -> Option<CanonicalRow> {
        self.get_normalizer(source).map(|n| n.to_canonical(row))
    }
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

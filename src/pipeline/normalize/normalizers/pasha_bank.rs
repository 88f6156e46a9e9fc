use super::base::SourceNormalizer;
use crate::pipeline::normalize::{CanonicalRow, SourceRow};
use crate::types::Source;

/// PASHA Bank publishes its own field names; everything maps one to one.
pub struct PashaBankNormalizer;

impl SourceNormalizer for PashaBankNormalizer {
    fn source(&self) -> Source {
        Source::PashaBank
    }

    fn name(&self) -> &str {
        "PASHA Bank Normalizer"
    }

    fn to_canonical(&self, row: &SourceRow) -> CanonicalRow {
        CanonicalRow {
            name: row.text("name"),
            address: row.text("address"),
            phone: row.text("phone"),
            website: row.text("website"),
            logo_url: row.text("logo_url"),
            down_payment: row.text("down_payment"),
            annual_rate: row.text("annual_rate"),
            term: row.text("term"),
            ..CanonicalRow::for_source(self.source())
        }
    }
}

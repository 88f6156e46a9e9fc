use super::base::SourceNormalizer;
use crate::pipeline::normalize::{CanonicalRow, SourceRow};
use crate::types::Source;

pub struct XalqBankNormalizer;

impl SourceNormalizer for XalqBankNormalizer {
    fn source(&self) -> Source {
        Source::XalqBank
    }

    fn name(&self) -> &str {
        "Xalq Bank Normalizer"
    }

    fn to_canonical(&self, row: &SourceRow) -> CanonicalRow {
        CanonicalRow {
            name: row.text("name"),
            region: row.text("region"),
            address: row.text("address"),
            phone: row.text("phone"),
            website: row.text("website"),
            logo_url: row.text("logo_url"),
            ..CanonicalRow::for_source(self.source())
        }
    }
}

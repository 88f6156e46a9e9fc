use super::base::SourceNormalizer;
use crate::pipeline::normalize::{CanonicalRow, SourceRow};
use crate::types::Source;

/// ABB Home reports program minimums/maximums under its own column names.
pub struct AbbHomeNormalizer;

impl SourceNormalizer for AbbHomeNormalizer {
    fn source(&self) -> Source {
        Source::AbbHome
    }

    fn name(&self) -> &str {
        "ABB Home Normalizer"
    }

    fn to_canonical(&self, row: &SourceRow) -> CanonicalRow {
        CanonicalRow {
            name: row.text("name"),
            phone: row.text("phone"),
            address: row.text("address"),
            website: row.text("website"),
            logo_url: row.text("logo_url"),
            down_payment: row.text("min_down_payment"),
            annual_rate: row.text("min_annual_rate"),
            term: row.text("max_term"),
            max_loan_amount: row.text("max_loan_amount"),
            ..CanonicalRow::for_source(self.source())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abb_home_renames_program_fields() {
        let row = SourceRow::from_iter([
            ("name", "Gamma City"),
            ("phone", "937"),
            ("address", "Xirdalan"),
            ("website", "gamma.az"),
            ("logo_url", "gamma.png"),
            ("min_down_payment", "10"),
            ("min_annual_rate", "7.5"),
            ("max_term", "30"),
            ("max_loan_amount", "500000"),
        ]);

        let canonical = AbbHomeNormalizer.to_canonical(&row);

        assert_eq!(canonical.source, "ABB Home");
        assert_eq!(canonical.name, "Gamma City");
        assert_eq!(canonical.down_payment, "10");
        assert_eq!(canonical.annual_rate, "7.5");
        assert_eq!(canonical.term, "30");
        assert_eq!(canonical.max_loan_amount, "500000");
        assert_eq!(canonical.min_loan_amount, "");
        assert_eq!(canonical.region, "");
    }
}

use super::base::SourceNormalizer;
use crate::pipeline::normalize::{coalesce, CanonicalRow, SourceRow};
use crate::types::Source;

/// BirBank lists residential complexes with their developer; a row without a
/// complex falls back to the developer's name, phone and logo.
pub struct BirBankNormalizer;

impl SourceNormalizer for BirBankNormalizer {
    fn source(&self) -> Source {
        Source::BirBank
    }

    fn name(&self) -> &str {
        "BirBank Normalizer"
    }

    fn to_canonical(&self, row: &SourceRow) -> CanonicalRow {
        CanonicalRow {
            name: coalesce(row, &["complex_name", "partner_name"]),
            partner_name: row.text("partner_name"),
            region: row.text("region_id"),
            address: row.text("partner_address"),
            phone: coalesce(row, &["phone_mobile1", "phone_short"]),
            email: row.text("email"),
            website: row.text("website"),
            facebook: row.text("facebook"),
            instagram: row.text("instagram"),
            logo_url: coalesce(row, &["complex_logo_url", "partner_logo_url"]),
            down_payment: row.text("initial_payment_pct"),
            annual_rate: row.text("mortgage_rate_pct"),
            term: row.text("mortgage_period_years"),
            min_loan_amount: row.text("min_loan_amount"),
            max_loan_amount: row.text("max_loan_amount"),
            latitude: row.text("latitude"),
            longitude: row.text("longitude"),
            ..CanonicalRow::for_source(self.source())
        }
    }
}

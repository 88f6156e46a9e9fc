pub mod normalizers;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::CANONICAL_FIELDS;
use crate::types::Source;

/// One row of the unified table. Field order is the column order of the output file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub source: String,
    pub name: String,
    pub partner_name: String,
    pub region: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub facebook: String,
    pub instagram: String,
    pub logo_url: String,
    pub down_payment: String,
    pub annual_rate: String,
    pub term: String,
    pub min_loan_amount: String,
    pub max_loan_amount: String,
    pub latitude: String,
    pub longitude: String,
}

impl CanonicalRow {
    /// Row tagged with its source and every other field empty
    pub fn for_source(source: Source) -> Self {
        Self {
            source: source.tag().to_string(),
            ..Self::default()
        }
    }

    /// Values in `CANONICAL_FIELDS` order
    pub fn values(&self) -> [&str; 18] {
        [
            self.source.as_str(),
            self.name.as_str(),
            self.partner_name.as_str(),
            self.region.as_str(),
            self.address.as_str(),
            self.phone.as_str(),
            self.email.as_str(),
            self.website.as_str(),
            self.facebook.as_str(),
            self.instagram.as_str(),
            self.logo_url.as_str(),
            self.down_payment.as_str(),
            self.annual_rate.as_str(),
            self.term.as_str(),
            self.min_loan_amount.as_str(),
            self.max_loan_amount.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        CANONICAL_FIELDS
            .iter()
            .position(|f| *f == field)
            .map(|i| self.values()[i])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        CANONICAL_FIELDS.into_iter().zip(self.values())
    }
}

/// One row of a per-source intermediate table, keyed by its header.
/// Columns the table does not have read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    values: HashMap<String, String>,
}

impl SourceRow {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Owned copy of a field, for building canonical rows
    pub fn text(&self, field: &str) -> String {
        self.get(field).to_string()
    }
}

impl<K, V> FromIterator<(K, V)> for SourceRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// First non-empty value among `fields`, in order; empty when all are empty.
pub fn coalesce(row: &SourceRow, fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| row.get(field))
        .find(|value| !value.is_empty())
        .unwrap_or("")
        .to_string()
}

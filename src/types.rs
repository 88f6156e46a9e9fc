use crate::constants::{
    ABB_HOME_SOURCE, ABB_HOME_TAG, BIR_BANK_SOURCE, BIR_BANK_TAG, PASHA_BANK_SOURCE,
    PASHA_BANK_TAG, XALQ_BANK_SOURCE, XALQ_BANK_TAG,
};
use crate::error::ScraperError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A bank whose partner listing feeds the unified table.
///
/// Declaration order is the assembly order of the unified table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    PashaBank,
    AbbHome,
    XalqBank,
    BirBank,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::PashaBank,
        Source::AbbHome,
        Source::XalqBank,
        Source::BirBank,
    ];

    /// Identifier used on the CLI, in config and as the intermediate file stem
    pub fn id(&self) -> &'static str {
        match self {
            Source::PashaBank => PASHA_BANK_SOURCE,
            Source::AbbHome => ABB_HOME_SOURCE,
            Source::XalqBank => XALQ_BANK_SOURCE,
            Source::BirBank => BIR_BANK_SOURCE,
        }
    }

    /// Value written to the `source` column
    pub fn tag(&self) -> &'static str {
        match self {
            Source::PashaBank => PASHA_BANK_TAG,
            Source::AbbHome => ABB_HOME_TAG,
            Source::XalqBank => XALQ_BANK_TAG,
            Source::BirBank => BIR_BANK_TAG,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.id())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Source {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScraperError::Config(format!("unknown source '{}'", s.trim())))
    }
}

/// Loosely-typed record recovered from a page: field name to text, in
/// insertion order. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Records of one source plus the union of their field names in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct IntermediateTable {
    fields: Vec<String>,
    seen: HashSet<String>,
    records: Vec<RawRecord>,
}

impl IntermediateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = RawRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.push(record);
        }
        table
    }

    pub fn push(&mut self, record: RawRecord) {
        for key in record.keys() {
            if !self.seen.contains(key) {
                self.seen.insert(key.to_string());
                self.fields.push(key.to_string());
            }
        }
        self.records.push(record);
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Each record's values aligned to `fields()`; absent fields are empty.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.records.iter().map(move |record| {
            self.fields
                .iter()
                .map(|field| record.get(field).unwrap_or(""))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_replaces_value_in_place() {
        let mut record = RawRecord::new();
        record.insert("name", "first");
        record.insert("phone", "123");
        record.insert("name", "second");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["name", "phone"]);
        assert_eq!(record.get("name"), Some("second"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_table_fields_follow_first_seen_order() {
        let table = IntermediateTable::from_records(vec![
            RawRecord::from_iter([("name", "A"), ("phone", "1")]),
            RawRecord::from_iter([("raw_text", "x"), ("name", "B")]),
            RawRecord::from_iter([("address", "Baku"), ("phone", "2")]),
        ]);

        assert_eq!(table.fields(), ["name", "phone", "raw_text", "address"]);

        let rows: Vec<Vec<&str>> = table.rows().collect();
        assert_eq!(rows[0], vec!["A", "1", "", ""]);
        assert_eq!(rows[1], vec!["B", "", "x", ""]);
        assert_eq!(rows[2], vec!["", "2", "", "Baku"]);
    }

    #[test]
    fn test_source_ids_round_trip_through_from_str() {
        for source in Source::ALL {
            assert_eq!(source.id().parse::<Source>().unwrap(), source);
        }
        assert_eq!(" BirBank ".parse::<Source>().unwrap(), Source::BirBank);
        assert!("unknown".parse::<Source>().is_err());
    }

    #[test]
    fn test_source_file_names() {
        assert_eq!(Source::PashaBank.file_name(), "pashabank.csv");
        assert_eq!(Source::BirBank.tag(), "BirBank");
    }
}

use crate::constants::CANONICAL_FIELDS;
use crate::error::Result;
use crate::pipeline::normalize::{CanonicalRow, SourceRow};
use crate::types::{IntermediateTable, Source};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV files under one data directory: one intermediate table per source,
/// plus the unified output.
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    data_dir: PathBuf,
}

impl CsvTableStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn table_path(&self, source: Source) -> PathBuf {
        self.data_dir.join(source.file_name())
    }

    /// Writes the table with a header of its first-seen field order.
    pub fn write_intermediate(&self, source: Source, table: &IntermediateTable) -> Result<PathBuf> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.table_path(source);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(table.fields())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;

        debug!("Wrote {} rows to {}", table.len(), path.display());
        Ok(path)
    }

    /// Deletes a source's intermediate table. Returns false when there was none.
    pub fn remove_table(&self, source: Source) -> Result<bool> {
        let path = self.table_path(source);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        debug!("Removed {}", path.display());
        Ok(true)
    }

    /// Rows of a source's intermediate table, or None when the file does not exist.
    pub fn read_source_rows(&self, source: Source) -> Result<Option<Vec<SourceRow>>> {
        let path = self.table_path(source);
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(headers.iter().zip(record.iter()).collect::<SourceRow>());
        }
        Ok(Some(rows))
    }

    /// Writes the unified table; the header is written even when there are no rows.
    pub fn write_unified(&self, path: &Path, rows: &[CanonicalRow]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(CANONICAL_FIELDS)?;
        for row in rows {
            writer.write_record(row.values())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRecord;
    use tempfile::TempDir;

    #[test]
    fn test_intermediate_table_header_and_blank_cells() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path().join("data"));
        let table = IntermediateTable::from_records(vec![
            RawRecord::from_iter([("name", "Alpha, LLC"), ("phone", "012")]),
            RawRecord::from_iter([("raw_text", "line \"quoted\"")]),
        ]);

        let path = store.write_intermediate(Source::PashaBank, &table).unwrap();

        assert_eq!(path, dir.path().join("data").join("pashabank.csv"));
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "name,phone,raw_text");
        assert_eq!(lines[1], "\"Alpha, LLC\",012,");
        assert_eq!(lines[2], ",,\"line \"\"quoted\"\"\"");
    }

    #[test]
    fn test_read_source_rows_round_trips_written_table() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path());
        let table = IntermediateTable::from_records(vec![RawRecord::from_iter([
            ("complex_name", ""),
            ("partner_name", "Builder X"),
        ])]);
        store.write_intermediate(Source::BirBank, &table).unwrap();

        let rows = store.read_source_rows(Source::BirBank).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("complex_name"), "");
        assert_eq!(rows[0].get("partner_name"), "Builder X");
    }

    #[test]
    fn test_missing_table_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path());
        assert!(store.read_source_rows(Source::XalqBank).unwrap().is_none());
    }

    #[test]
    fn test_short_rows_read_missing_cells_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path());
        fs::write(store.table_path(Source::XalqBank), "name,region,phone\nDelta,Ganja\n").unwrap();

        let rows = store.read_source_rows(Source::XalqBank).unwrap().unwrap();
        assert_eq!(rows[0].get("region"), "Ganja");
        assert_eq!(rows[0].get("phone"), "");
    }

    #[test]
    fn test_remove_table() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path());
        fs::write(store.table_path(Source::AbbHome), "name\nAlpha\n").unwrap();

        assert!(store.remove_table(Source::AbbHome).unwrap());
        assert!(!store.table_path(Source::AbbHome).exists());
        assert!(!store.remove_table(Source::AbbHome).unwrap());
    }

    #[test]
    fn test_unified_header_written_without_rows() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path());
        let path = dir.path().join("out").join("data.csv");

        store.write_unified(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), CANONICAL_FIELDS.join(","));
    }
}

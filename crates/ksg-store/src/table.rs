//! In-memory form of the persisted table
//!
//! Every cell is a string. The column set is the union of the keys of all
//! rows pushed so far; a row that lacks a column reads back as empty there.

use crate::error::{StoreError, StoreResult};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::{Read, Write};

/// Header plus rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Create a table with no columns and no rows
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names in header order
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column` in the header
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell at `row`, `column`; `None` when either is unknown
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// All cells of one column, top to bottom
    #[must_use]
    pub fn column(&self, column: &str) -> Option<Vec<&str>> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(|r| r[col].as_str()).collect())
    }

    /// One row keyed by column name
    #[must_use]
    pub fn row(&self, row: usize) -> Option<IndexMap<&str, &str>> {
        self.rows.get(row).map(|cells| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(cells.iter().map(String::as_str))
                .collect()
        })
    }

    /// Iterate rows as cell slices in header order
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Append one record, widening the header with any unseen keys
    pub fn push(&mut self, fields: &IndexMap<String, String>) {
        for key in fields.keys() {
            if self.column_index(key).is_none() {
                self.columns.push(key.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }
        let row = self
            .columns
            .iter()
            .map(|c| fields.get(c).cloned().unwrap_or_default())
            .collect();
        self.rows.push(row);
    }

    /// Table holding only the last `n` rows
    #[must_use]
    pub fn tail(&self, n: usize) -> Self {
        let start = self.rows.len().saturating_sub(n);
        Self {
            columns: self.columns.clone(),
            rows: self.rows[start..].to_vec(),
        }
    }

    /// Parse comma-separated text with a header row
    ///
    /// Fails on ragged rows, a blank or duplicated header, or malformed
    /// quoting; callers decide whether that is fatal.
    pub fn from_csv<R: Read>(reader: R) -> StoreResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if columns.iter().all(|c| c.trim().is_empty()) {
            return Err(StoreError::corrupt("missing header row"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(StoreError::corrupt(format!("duplicate column '{dup}'")));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { columns, rows })
    }

    /// Write the header and every row as comma-separated text
    ///
    /// An empty table with no columns writes nothing.
    pub fn write_csv<W: Write>(&self, writer: W) -> StoreResult<()> {
        if self.columns.is_empty() {
            return Ok(());
        }
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush().map_err(|e| StoreError::io("<csv writer>", e))?;
        Ok(())
    }

    /// Serialized bytes, as offered for download
    pub fn to_csv_bytes(&self) -> StoreResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn new_keys_become_columns_empty_for_older_rows() {
        let mut table = RecordTable::new();
        table.push(&fields(&[("a", "1"), ("b", "2")]));
        table.push(&fields(&[("a", "3"), ("c", "4")]));

        assert_eq!(table.columns(), ["a", "b", "c"]);
        assert_eq!(table.get(0, "c"), Some(""));
        assert_eq!(table.get(1, "b"), Some(""));
        assert_eq!(table.get(1, "c"), Some("4"));
    }

    #[test]
    fn csv_keeps_quoted_commas() {
        let mut table = RecordTable::new();
        table.push(&fields(&[("samplers_shelves", "No, kept on the floor")]));
        let bytes = table.to_csv_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "samplers_shelves\n\"No, kept on the floor\"\n"
        );
        let back = RecordTable::from_csv(bytes.as_slice()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = RecordTable::from_csv("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Csv(_)));
    }

    #[test]
    fn blank_header_is_corrupt() {
        let err = RecordTable::from_csv("   \n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn duplicate_header_is_corrupt() {
        let err = RecordTable::from_csv("a,a\n1,2\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"));
    }

    #[test]
    fn tail_keeps_last_rows() {
        let mut table = RecordTable::new();
        for i in 0..7 {
            let n = i.to_string();
            table.push(&fields(&[("n", n.as_str())]));
        }
        let tail = table.tail(5);
        assert_eq!(tail.column("n").unwrap(), vec!["2", "3", "4", "5", "6"]);
        assert_eq!(table.tail(100).len(), 7);
    }

    #[test]
    fn empty_table_writes_nothing() {
        assert!(RecordTable::new().to_csv_bytes().unwrap().is_empty());
    }
}

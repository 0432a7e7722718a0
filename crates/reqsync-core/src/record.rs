//! Field records sourced from the tabular store
//!
//! A [`FieldRecord`] maps column headers to cell values for one data row.
//! A [`Sheet`] holds a header row plus data rows and converts between the
//! two shapes in both directions.

use crate::error::RecordError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of verification slots a requirement row can carry
pub const MAX_VERIFICATIONS: usize = 10;

/// Conventional column headers of a requirement sheet
pub mod keys {
    pub const ID: &str = "ID";
    pub const TITLE: &str = "Title";
    pub const DESCRIPTION: &str = "Description";
    pub const SOURCE: &str = "Source";
    pub const AUTHOR: &str = "Author";
    pub const ASSIGNEE: &str = "Assignee";
    pub const JUSTIFICATION: &str = "Justification";
    pub const COMPLIANCE: &str = "Compliance";
    pub const CRITICALITY: &str = "Criticality";

    /// `Verification Method i`
    #[must_use]
    pub fn verification_method(index: usize) -> String {
        format!("Verification Method {index}")
    }

    /// `Verification Deadline i`
    #[must_use]
    pub fn verification_deadline(index: usize) -> String {
        format!("Verification Deadline {index}")
    }

    /// `Verification Status i`
    #[must_use]
    pub fn verification_status(index: usize) -> String {
        format!("Verification Status {index}")
    }
}

/// Values treated as "no value" in addition to the empty string
pub const ABSENT_SENTINELS: [&str; 2] = ["N/A", "TBD"];

/// Check whether a cell value counts as absent
#[inline]
#[must_use]
pub fn is_absent(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_empty() || ABSENT_SENTINELS.contains(&v),
    }
}

/// Header-keyed row of cell values, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRecord {
    fields: IndexMap<String, String>,
}

impl FieldRecord {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a validated header and one data row
    ///
    /// Cells missing at the end of a short row become empty values.
    ///
    /// # Errors
    /// Returns [`RecordError::RowTooWide`] if the row has more populated
    /// cells than the header.
    pub fn from_row(header: &[String], row: &[String], row_number: usize) -> Result<Self, RecordError> {
        let populated = populated_width(row);
        if populated > header.len() {
            return Err(RecordError::RowTooWide {
                row: row_number,
                populated,
                header_width: header.len(),
            });
        }

        let fields = header
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect();
        Ok(Self { fields })
    }

    /// Builder-style insert
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Raw value for a key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value for a key, or `None` when absent per [`is_absent`]
    #[inline]
    #[must_use]
    pub fn present(&self, key: &str) -> Option<&str> {
        let value = self.get(key);
        if is_absent(value) {
            None
        } else {
            value
        }
    }

    /// The `ID` value, if present
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.present(keys::ID)
    }

    /// Iterate fields in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if every value is empty
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(String::is_empty)
    }
}

/// Header row plus data rows from one table range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Split raw rows into header and data
    ///
    /// Trailing empty header cells are dropped before validation.
    ///
    /// # Errors
    /// - [`RecordError::EmptySheet`] if there is no non-empty header row
    /// - [`RecordError::EmptyHeader`] / [`RecordError::DuplicateHeader`]
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Result<Self, RecordError> {
        if rows.is_empty() {
            return Err(RecordError::EmptySheet);
        }
        let mut header = rows.remove(0);
        header.truncate(populated_width(&header));
        if header.is_empty() {
            return Err(RecordError::EmptySheet);
        }
        validate_header(&header)?;
        Ok(Self { header, rows })
    }

    /// Build a sheet from records using an explicit column order
    ///
    /// Keys a record lacks are written as empty cells.
    #[must_use]
    pub fn from_records(header: &[&str], records: &[FieldRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                let mut row: Vec<String> = header
                    .iter()
                    .map(|key| record.get(key).unwrap_or_default().to_string())
                    .collect();
                row.truncate(populated_width(&row));
                row
            })
            .collect();
        Self {
            header: header.iter().map(|h| (*h).to_string()).collect(),
            rows,
        }
    }

    /// Header cells
    #[inline]
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows (without header)
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Convert every non-blank data row into a record
    ///
    /// Row numbers in errors are 1-based and count the header row.
    ///
    /// # Errors
    /// Returns the first [`RecordError::RowTooWide`] encountered; no partial
    /// list is ever returned.
    pub fn records(&self) -> Result<Vec<FieldRecord>, RecordError> {
        let mut records = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let record = FieldRecord::from_row(&self.header, row, i + 2)?;
            if !record.is_blank() {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Header followed by data rows
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.header);
        rows.extend(self.rows);
        rows
    }
}

fn validate_header(header: &[String]) -> Result<(), RecordError> {
    for (column, name) in header.iter().enumerate() {
        if name.is_empty() {
            return Err(RecordError::EmptyHeader { column: column + 1 });
        }
        if header[..column].contains(name) {
            return Err(RecordError::DuplicateHeader { name: name.clone() });
        }
    }
    Ok(())
}

/// Index one past the last non-empty cell
fn populated_width(row: &[String]) -> usize {
    row.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn absent_values() {
        assert!(is_absent(None));
        assert!(is_absent(Some("")));
        assert!(is_absent(Some("N/A")));
        assert!(is_absent(Some("TBD")));
        assert!(!is_absent(Some("tbd")));
        assert!(!is_absent(Some("value")));
    }

    #[test]
    fn from_row_pads_short_rows() {
        let header = row(&["ID", "Title", "Description"]);
        let record = FieldRecord::from_row(&header, &row(&["R1", "Foo"]), 2).unwrap();
        assert_eq!(record.get("Title"), Some("Foo"));
        assert_eq!(record.get("Description"), Some(""));
        assert_eq!(record.present("Description"), None);
    }

    #[test]
    fn from_row_rejects_wide_rows() {
        let header = row(&["ID", "Title"]);
        let err = FieldRecord::from_row(&header, &row(&["R1", "Foo", "extra"]), 4).unwrap_err();
        assert_eq!(
            err,
            RecordError::RowTooWide {
                row: 4,
                populated: 3,
                header_width: 2
            }
        );
    }

    #[test]
    fn from_row_ignores_trailing_empty_cells() {
        let header = row(&["ID", "Title"]);
        let record = FieldRecord::from_row(&header, &row(&["R1", "Foo", "", ""]), 2).unwrap();
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn sheet_rejects_bad_headers() {
        let empty = Sheet::from_rows(vec![row(&["ID", "", "Title"])]).unwrap_err();
        assert_eq!(empty, RecordError::EmptyHeader { column: 2 });

        let dup = Sheet::from_rows(vec![row(&["ID", "Title", "ID"])]).unwrap_err();
        assert_eq!(dup, RecordError::DuplicateHeader { name: "ID".into() });

        assert_eq!(Sheet::from_rows(vec![]).unwrap_err(), RecordError::EmptySheet);
        assert_eq!(Sheet::from_rows(vec![row(&["", ""])]).unwrap_err(), RecordError::EmptySheet);
    }

    #[test]
    fn sheet_records_skip_blank_rows() {
        let sheet = Sheet::from_rows(vec![
            row(&["ID", "Title"]),
            row(&["R1", "One"]),
            row(&[]),
            row(&["", ""]),
            row(&["R2", "Two"]),
        ])
        .unwrap();
        let records = sheet.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id(), Some("R2"));
    }

    #[test]
    fn sheet_records_report_row_number() {
        let sheet = Sheet::from_rows(vec![
            row(&["ID"]),
            row(&["R1"]),
            row(&["R2", "oops"]),
        ])
        .unwrap();
        let err = sheet.records().unwrap_err();
        assert!(matches!(err, RecordError::RowTooWide { row: 3, .. }));
    }

    #[test]
    fn sheet_from_records_uses_column_order() {
        let records = vec![
            FieldRecord::new().with("Title", "Foo").with("ID", "R1"),
            FieldRecord::new().with("ID", "Group"),
        ];
        let rows = Sheet::from_records(&["ID", "Title", "Description"], &records).into_rows();
        assert_eq!(rows[0], row(&["ID", "Title", "Description"]));
        assert_eq!(rows[1], row(&["R1", "Foo"]));
        assert_eq!(rows[2], row(&["Group"]));
    }

    #[test]
    fn record_keeps_header_order() {
        let record = FieldRecord::new().with("b", "2").with("a", "1");
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn verification_keys() {
        assert_eq!(keys::verification_method(3), "Verification Method 3");
        assert_eq!(keys::verification_deadline(10), "Verification Deadline 10");
        assert_eq!(keys::verification_status(1), "Verification Status 1");
    }
}

// src/table/mod.rs
pub mod read;
pub mod write;

pub use read::{parse_table, read_table};
pub use write::{write_rows, write_table};

use crate::error::SplitError;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

/// One record of a table. Values are stored in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    header: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .iter()
            .position(|h| h == column)
            .map(|i| self.values[i].as_str())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A delimited table loaded fully into memory, remembering where it came from.
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    header: Arc<[String]>,
    rows: Vec<Row>,
}

impl Table {
    /// Start an empty table. Column names must be unique.
    pub fn new(path: impl Into<PathBuf>, header: Vec<String>) -> Result<Self, SplitError> {
        let path = path.into();
        let mut seen = HashSet::with_capacity(header.len());
        if let Some(dup) = header.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(SplitError::DuplicateColumn {
                column: dup.clone(),
                path,
            });
        }
        Ok(Self {
            path,
            header: header.into(),
            rows: Vec::new(),
        })
    }

    /// Append a record read from `line`. Short records are padded with empty values.
    pub fn push(&mut self, mut values: Vec<String>, line: u64) -> Result<(), SplitError> {
        if values.len() > self.header.len() {
            return Err(SplitError::RaggedRow {
                path: self.path.clone(),
                line,
                expected: self.header.len(),
                found: values.len(),
            });
        }
        values.resize(self.header.len(), String::new());
        self.rows.push(Row {
            header: Arc::clone(&self.header),
            values,
        });
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.header.iter().any(|h| h == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows for which `keep` returns true, in their original order.
    pub fn retain(&mut self, keep: impl FnMut(&Row) -> bool) {
        self.rows.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn rows_look_up_values_by_column() -> Result<()> {
        let mut table = Table::new("samples.csv", header(&["sample", "group"]))?;
        table.push(vec!["s1".into(), "ctrl".into()], 2)?;

        let row = &table.rows()[0];
        assert_eq!(row.get("group"), Some("ctrl"));
        assert_eq!(row.get("batch"), None);
        assert_eq!(row.header(), &["sample", "group"]);
        assert_eq!(row.values(), &["s1", "ctrl"]);
        Ok(())
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = Table::new("dup.csv", header(&["id", "group", "id"])).unwrap_err();
        assert!(matches!(err, SplitError::DuplicateColumn { ref column, .. } if column == "id"));
    }

    #[test]
    fn short_records_are_padded_and_long_ones_rejected() -> Result<()> {
        let mut table = Table::new("t.csv", header(&["a", "b", "c"]))?;
        table.push(vec!["1".into()], 2)?;
        assert_eq!(table.rows()[0].values(), &["1", "", ""]);

        let err = table
            .push(vec!["1".into(), "2".into(), "3".into(), "4".into()], 3)
            .unwrap_err();
        assert!(matches!(
            err,
            SplitError::RaggedRow { line: 3, expected: 3, found: 4, .. }
        ));
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn retain_preserves_order() -> Result<()> {
        let mut table = Table::new("t.csv", header(&["n"]))?;
        for (i, n) in ["1", "2", "3", "4"].iter().enumerate() {
            table.push(vec![n.to_string()], i as u64 + 2)?;
        }
        table.retain(|r| r.get("n") != Some("2"));
        let kept: Vec<_> = table.rows().iter().filter_map(|r| r.get("n")).collect();
        assert_eq!(kept, vec!["1", "3", "4"]);
        Ok(())
    }
}

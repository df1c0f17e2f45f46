// src/table/write.rs
use std::{fs::File, io::BufWriter, path::Path};
use tracing::debug;

use super::{Row, Table};
use crate::dialect::Dialect;
use crate::error::SplitError;

/// Write `rows` with a header taken from the first row.
///
/// There is no header to take from an empty slice, so that is an error.
pub fn write_rows(path: &Path, rows: &[Row], dialect: &Dialect) -> Result<usize, SplitError> {
    let first = rows.first().ok_or_else(|| SplitError::EmptyTable {
        path: path.to_path_buf(),
    })?;
    write_records(path, first.header(), rows, dialect)
}

/// Write a whole table. A table without rows still gets its header line.
pub fn write_table(path: &Path, table: &Table, dialect: &Dialect) -> Result<usize, SplitError> {
    write_records(path, table.header(), table.rows(), dialect)
}

fn write_records(
    path: &Path,
    header: &[String],
    rows: &[Row],
    dialect: &Dialect,
) -> Result<usize, SplitError> {
    let csv_err = |source| SplitError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| SplitError::io(path, e))?;
    let mut wtr = dialect.writer_builder().from_writer(BufWriter::new(file));
    wtr.write_record(header).map_err(csv_err)?;
    for row in rows {
        if row.header() == header {
            wtr.write_record(row.values()).map_err(csv_err)?;
        } else {
            // same columns, different order
            wtr.write_record(header.iter().map(|col| row.get(col).unwrap_or("")))
                .map_err(csv_err)?;
        }
    }
    wtr.flush().map_err(|e| SplitError::io(path, e))?;

    debug!(path = %path.display(), rows = rows.len(), "table written");
    Ok(rows.len())
}

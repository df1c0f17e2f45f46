// src/table/read.rs
use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader, Read, Seek},
    path::Path,
};
use tracing::{debug, instrument};

use super::Table;
use crate::dialect::{Dialect, DialectDetector};
use crate::error::SplitError;

/// Load a whole table, detecting its dialect from the first line.
///
/// Pass a [`Dialect`] as the detector to skip sniffing altogether.
#[instrument(level = "debug", skip(path, detector), fields(path = %path.display()))]
pub fn read_table(path: &Path, detector: &dyn DialectDetector) -> Result<Table, SplitError> {
    let file = File::open(path).map_err(|e| SplitError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut first_line = String::new();
    reader
        .read_line(&mut first_line)
        .map_err(|e| SplitError::io(path, e))?;
    let dialect = detector.detect(&first_line)?;
    debug!(
        delimiter = ?dialect.delimiter_char(),
        skip_initial_space = dialect.skip_initial_space,
        "dialect detected"
    );
    debug!(
        escape = ?dialect.escape.map(char::from),
        quote = ?char::from(dialect.quote),
        "dialect quoting"
    );

    reader.rewind().map_err(|e| SplitError::io(path, e))?;
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| SplitError::io(path, e))?;

    parse_table(path, &text, &dialect)
}

/// Parse already-loaded text. The first record is the header; blank lines are skipped.
pub fn parse_table(path: &Path, text: &str, dialect: &Dialect) -> Result<Table, SplitError> {
    let text: Cow<'_, str> = if dialect.skip_initial_space {
        Cow::Owned(strip_initial_space(text, dialect))
    } else {
        Cow::Borrowed(text)
    };

    let mut rdr = dialect.reader_builder().from_reader(text.as_bytes());
    let mut table: Option<Table> = None;
    for result in rdr.records() {
        let record = result.map_err(|source| SplitError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let values: Vec<String> = record.iter().map(str::to_string).collect();
        match table.as_mut() {
            None => table = Some(Table::new(path, values)?),
            Some(t) => {
                let line = record.position().map_or(0, |p| p.line());
                t.push(values, line)?;
            }
        }
    }

    match table {
        Some(t) => Ok(t),
        None => Table::new(path, Vec::new()),
    }
}

/// Drop the spaces that open a field, leaving quoted content alone.
fn strip_initial_space(text: &str, dialect: &Dialect) -> String {
    let delimiter = char::from(dialect.delimiter);
    let quote = char::from(dialect.quote);
    let escape = dialect.escape.map(char::from);

    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    // the previous char closed a quoted section; a quote right after it is a doubled quote
    let mut just_closed = false;
    let mut escaped = false;
    let mut field_start = true;
    for c in text.chars() {
        if field_start && c == ' ' {
            continue;
        }
        let opening = field_start;
        let after_close = just_closed;
        field_start = false;
        just_closed = false;
        if escaped {
            escaped = false;
        } else if Some(c) == escape {
            escaped = true;
        } else if in_quotes {
            if c == quote {
                in_quotes = false;
                just_closed = true;
            }
        } else if c == quote && (opening || (after_close && dialect.double_quote)) {
            in_quotes = true;
        } else if c == delimiter || c == '\n' || c == '\r' {
            field_start = true;
        }
        out.push(c);
    }
    out
}

use std::{io, path::PathBuf};
use thiserror::Error;

/// Everything that can stop a split run.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed table {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not detect dialect of {sample:?}: {reason}")]
    DialectDetection { sample: String, reason: String },

    #[error("{} does not contain a '{column}' column", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("{} has more than one '{column}' column", path.display())]
    DuplicateColumn { column: String, path: PathBuf },

    #[error("{} line {line}: expected at most {expected} fields, found {found}", path.display())]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("nothing to write to {}: no rows to take a header from", path.display())]
    EmptyTable { path: PathBuf },
}

impl SplitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_column(column: &str, path: impl Into<PathBuf>) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            path: path.into(),
        }
    }
}

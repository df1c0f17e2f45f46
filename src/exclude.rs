// src/exclude.rs
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::dialect::DialectDetector;
use crate::error::SplitError;
use crate::table::{Row, Table};

/// Contrast column naming the samples column to test.
pub const EXCLUDE_COL: &str = "exclude_samples_col";
/// Contrast column listing the values to drop, in one delimited string.
pub const EXCLUDE_VALUES: &str = "exclude_samples_values";

/// What a contrast row asks to drop from the samples table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub column: String,
    pub values: HashSet<String>,
}

impl Exclusion {
    /// Read the exclusion out of a contrast row.
    ///
    /// `None` when the contrasts table lacks either exclusion column or the
    /// row's value list is empty. The list delimiter is sniffed from the list
    /// itself, so a single value without any separator gets split on whatever
    /// character the detector settles on.
    pub fn from_contrast(
        contrast_header: &[String],
        contrast: &Row,
        detector: &dyn DialectDetector,
    ) -> Result<Option<Self>, SplitError> {
        let has = |col: &str| contrast_header.iter().any(|h| h == col);
        if !has(EXCLUDE_COL) || !has(EXCLUDE_VALUES) {
            return Ok(None);
        }
        let raw = contrast.get(EXCLUDE_VALUES).unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        let column = contrast.get(EXCLUDE_COL).unwrap_or_default().to_string();

        let delimiter = detector.detect(raw)?.delimiter_char();
        debug!(?delimiter, "exclude_samples_values delimiter");
        if delimiter.is_alphanumeric() {
            warn!(
                list = raw,
                ?delimiter,
                "exclusion list has no recognisable separator; splitting on a letter"
            );
        }

        let values = raw.split(delimiter).map(str::to_string).collect();
        Ok(Some(Self { column, values }))
    }

    pub fn excludes(&self, row: &Row) -> bool {
        row.get(&self.column)
            .is_some_and(|value| self.values.contains(value))
    }
}

/// Drop the sample rows a contrast excludes; everything else passes through in order.
pub fn filter_samples(
    mut samples: Table,
    contrast_header: &[String],
    contrast: &Row,
    detector: &dyn DialectDetector,
) -> Result<Table, SplitError> {
    let Some(exclusion) = Exclusion::from_contrast(contrast_header, contrast, detector)? else {
        info!(
            id = contrast.get("id").unwrap_or_default(),
            "no exclusions for contrast; keeping every sample"
        );
        return Ok(samples);
    };

    if !samples.has_column(&exclusion.column) {
        return Err(SplitError::missing_column(&exclusion.column, samples.path()));
    }

    let before = samples.len();
    samples.retain(|row| !exclusion.excludes(row));
    debug!(
        column = %exclusion.column,
        kept = samples.len(),
        dropped = before - samples.len(),
        "samples filtered"
    );
    if let Some(last) = samples.rows().last() {
        debug!(row = ?last.values(), "last kept sample");
    }
    Ok(samples)
}

// src/split.rs
use std::{
    fs,
    io,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, info, instrument};

use crate::dialect::{Dialect, DialectDetector, Sniffer};
use crate::error::SplitError;
use crate::exclude::filter_samples;
use crate::table::{read_table, write_rows, write_table};

/// Column every contrast row must carry; it names the output files.
pub const ID_COLUMN: &str = "id";

/// Extension of every file written.
pub const OUTPUT_EXT: &str = "csv";

/// Where to read from and where to write to.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub samples: PathBuf,
    pub contrasts: PathBuf,
    pub output_dir: PathBuf,
}

impl SplitConfig {
    pub fn contrast_path(&self, id: &str) -> PathBuf {
        self.output_dir.join(format!("contrast__{id}.{OUTPUT_EXT}"))
    }

    pub fn sample_path(&self, id: &str) -> PathBuf {
        self.output_dir.join(format!("sample__{id}.{OUTPUT_EXT}"))
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub contrasts: usize,
    pub sample_rows_written: usize,
}

/// Splits a samples/contrasts pair into one file pair per contrast.
///
/// Input tables go through `detector`, exclusion lists through
/// `list_detector`; output is always written with [`Dialect::excel`].
pub struct Splitter<D = Sniffer, L = Sniffer> {
    config: SplitConfig,
    detector: D,
    list_detector: L,
    output: Dialect,
}

impl Splitter<Sniffer> {
    pub fn new(config: SplitConfig) -> Self {
        Self::with_detector(config, Sniffer::new())
    }
}

impl<D: DialectDetector> Splitter<D> {
    /// Fixes how the input tables are read. Exclusion lists are still sniffed.
    pub fn with_detector(config: SplitConfig, detector: D) -> Self {
        Self::with_detectors(config, detector, Sniffer::new())
    }
}

impl<D: DialectDetector, L: DialectDetector> Splitter<D, L> {
    pub fn with_detectors(config: SplitConfig, detector: D, list_detector: L) -> Self {
        Self {
            config,
            detector,
            list_detector,
            output: Dialect::excel(),
        }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Any failure aborts the run; files already written for earlier contrasts stay.
    #[instrument(level = "info", skip(self), fields(
        samples = %self.config.samples.display(),
        contrasts = %self.config.contrasts.display()
    ))]
    pub fn run(&self) -> Result<SplitSummary, SplitError> {
        let start = Instant::now();
        self.check_output_dir()?;

        let contrasts = read_table(&self.config.contrasts, &self.detector)?;
        if !contrasts.has_column(ID_COLUMN) {
            return Err(SplitError::missing_column(ID_COLUMN, contrasts.path()));
        }
        // fail on an unreadable samples file before anything is written
        let preflight = read_table(&self.config.samples, &self.detector)?;
        debug!(
            contrasts = contrasts.len(),
            samples = preflight.len(),
            "inputs loaded"
        );

        let mut summary = SplitSummary::default();
        for contrast in contrasts.rows() {
            let id = contrast.get(ID_COLUMN).unwrap_or_default();
            info!(id, "creating contrast files");

            write_rows(
                &self.config.contrast_path(id),
                std::slice::from_ref(contrast),
                &self.output,
            )?;

            debug!(id, "finding samples for contrast");
            let samples = read_table(&self.config.samples, &self.detector)?;
            let samples = filter_samples(
                samples,
                contrasts.header(),
                contrast,
                &self.list_detector,
            )?;
            summary.sample_rows_written +=
                write_table(&self.config.sample_path(id), &samples, &self.output)?;
            summary.contrasts += 1;
        }

        info!(
            contrasts = summary.contrasts,
            sample_rows = summary.sample_rows_written,
            elapsed = ?start.elapsed(),
            "task finished"
        );
        Ok(summary)
    }

    fn check_output_dir(&self) -> Result<(), SplitError> {
        let dir: &Path = &self.config.output_dir;
        let meta = fs::metadata(dir).map_err(|e| SplitError::io(dir, e))?;
        if !meta.is_dir() {
            return Err(SplitError::io(
                dir,
                io::Error::new(io::ErrorKind::Other, "not a directory"),
            ));
        }
        Ok(())
    }
}

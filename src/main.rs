use anyhow::{bail, Context, Result};
use clap::Parser;
use split_contrasts::{
    logging::{init_logging, LogConfig, Verbosity},
    SplitConfig, Splitter,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    name = "split_contrasts",
    version,
    about = "Split one sample file and one contrast file into per-contrast sample and contrast files"
)]
struct Args {
    /// Location of sample file
    #[arg(
        value_name = "SAMPLE",
        required_unless_present = "samples",
        conflicts_with = "samples"
    )]
    sample: Option<PathBuf>,

    /// Location of contrast file
    #[arg(
        value_name = "CONTRAST",
        required_unless_present = "contrasts",
        conflicts_with = "contrasts"
    )]
    contrast: Option<PathBuf>,

    /// Location of sample file, as a flag
    #[arg(short = 's', long = "samples", value_name = "SAMPLE")]
    samples: Option<PathBuf>,

    /// Location of contrast file, as a flag
    #[arg(short = 'c', long = "contrasts", value_name = "CONTRAST")]
    contrasts: Option<PathBuf>,

    /// File output location (must already exist)
    #[arg(short = 'o', long = "Output", value_name = "OUTPUT", default_value = ".")]
    output: PathBuf,

    /// Set logging level
    #[arg(short = 'v', long = "verbose", value_enum, default_value_t = Verbosity::Error)]
    verbosity: Verbosity,
}

impl Args {
    fn split_config(self) -> Result<SplitConfig> {
        let (Some(samples), Some(contrasts)) = (
            self.sample.or(self.samples),
            self.contrast.or(self.contrasts),
        ) else {
            bail!("both a sample file and a contrast file are required");
        };
        Ok(SplitConfig {
            samples,
            contrasts,
            output_dir: self.output,
        })
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let log = LogConfig {
        verbosity: args.verbosity,
    };
    if let Err(e) = init_logging(log) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    // ─── 2) split ────────────────────────────────────────────────────
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.split_config()?;
    debug!(?config, "configuration");

    let splitter = Splitter::new(config);
    let summary = splitter.run().with_context(|| {
        format!(
            "splitting {} by {}",
            splitter.config().samples.display(),
            splitter.config().contrasts.display()
        )
    })?;
    info!(
        contrasts = summary.contrasts,
        out = %splitter.config().output_dir.display(),
        "all done"
    );
    Ok(())
}

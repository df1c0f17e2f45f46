// src/logging.rs
use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

/// How chatty the console output is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Verbosity {
    #[default]
    Error,
    Warning,
    Info,
    Debug,
}

impl Verbosity {
    pub fn level(self) -> Level {
        match self {
            Verbosity::Error => Level::ERROR,
            Verbosity::Warning => Level::WARN,
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
        }
    }
}

/// Logging setup handed to [`init_logging`] by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogConfig {
    pub verbosity: Verbosity,
}

impl LogConfig {
    pub fn filter(&self) -> EnvFilter {
        let level = LevelFilter::from_level(self.verbosity.level());
        EnvFilter::new("").add_directive(level.into())
    }
}

/// Leveled, human-readable lines on stderr. Only the first call per process takes effect.
pub fn init_logging(config: LogConfig) -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(config.filter())
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_names_match_the_cli() {
        let names: Vec<_> = Verbosity::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|p| p.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["error", "warning", "info", "debug"]);
    }

    #[test]
    fn default_is_errors_only() {
        let config = LogConfig::default();
        assert_eq!(config.verbosity, Verbosity::Error);
        assert_eq!(config.verbosity.level(), Level::ERROR);
        assert_eq!(Verbosity::Warning.level(), Level::WARN);
        assert_eq!(
            LogConfig { verbosity: Verbosity::Info }.filter().max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}

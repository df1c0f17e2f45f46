//! Split a samples sheet and a contrasts sheet into one contrast file and one
//! filtered samples file per contrast.

pub mod dialect;
pub mod error;
pub mod exclude;
pub mod logging;
pub mod split;
pub mod table;

pub use dialect::{Dialect, DialectDetector, Sniffer};
pub use error::SplitError;
pub use split::{SplitConfig, SplitSummary, Splitter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

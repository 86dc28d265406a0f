//! Health probe for a SQL proxy layer.
//!
//! This crate turns the listings printed by the proxy's administration tool
//! into a monitoring verdict:
//! - servers, sessions and monitors are parsed from `|` tables or TSV rows
//! - a fixed set of rules turns the records into problems
//! - the problems reduce to one severity, summary line and exit code
//!
//! A proxy that cannot be queried at all yields a single critical problem and
//! no other check runs.
//!
//! # Example
//!
//! ```no_run
//! use proxycheck::{AdminTool, CommandSource, Probe, Thresholds};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let tool = AdminTool::Maxctrl;
//! let source = CommandSource::new(tool, Duration::from_secs(10));
//! let thresholds = Thresholds::new(3).with_expected_master("db1");
//!
//! let report = Probe::new(source, tool.format(), thresholds).run().await;
//! println!("{}", report.verdict);
//! std::process::exit(report.exit_code().into());
//! # }
//! ```

pub mod checks;
pub mod parser;
pub mod probe;
pub mod source;
pub mod types;
pub mod verdict;

pub use probe::{Probe, Report};
pub use source::{CommandSource, DirectorySource, Listing, ListingSource, StaticSource};
pub use types::{
    AdminTool, Format, Inventory, MonitorRecord, Problem, ProblemKind, ServerRecord,
    SessionRecord, Severity, Thresholds,
};
pub use verdict::Verdict;

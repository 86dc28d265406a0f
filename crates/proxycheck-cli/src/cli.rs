//! Command line definition.

use crate::config::{MAX_COMMAND_TIMEOUT, MIN_COMMAND_TIMEOUT};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use proxycheck::AdminTool;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a humantime duration such as `500ms` or `3s` within the allowed
/// command timeout range.
fn parse_timeout(value: &str) -> Result<Duration, String> {
    let timeout = humantime::parse_duration(value).map_err(|e| e.to_string())?;
    if !(MIN_COMMAND_TIMEOUT..=MAX_COMMAND_TIMEOUT).contains(&timeout) {
        return Err(format!(
            "must be between {} and {}",
            humantime::format_duration(MIN_COMMAND_TIMEOUT),
            humantime::format_duration(MAX_COMMAND_TIMEOUT)
        ));
    }
    Ok(timeout)
}

/// How the report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plugin summary line, preceded by a dump with --verbose
    #[default]
    Text,
    /// One JSON document
    Json,
}

/// Check the health of a SQL proxy through its administration tool
#[derive(Debug, Clone, Parser)]
#[command(name = "check-sqlproxy", version)]
pub struct Cli {
    /// Number of backend servers that should be listed
    #[arg(short = 'e', long, value_name = "COUNT")]
    pub expected_servers: usize,

    /// Name of the server expected to be in Master mode
    #[arg(short = 'm', long, value_name = "NAME")]
    pub expected_master: Option<String>,

    /// Warn when a server has more connections than this [default: 500]
    #[arg(
        short = 'c',
        long = "connections",
        value_name = "COUNT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_connections: Option<u64>,

    /// Warn when there are more sessions than this [default: 1000]
    #[arg(
        short = 's',
        long = "sessions",
        value_name = "COUNT",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_sessions: Option<usize>,

    /// Administration tool to query: maxadmin or maxctrl [default: maxadmin]
    #[arg(short = 't', long, value_name = "TOOL")]
    pub tool: Option<AdminTool>,

    /// Path of the administration tool binary
    #[arg(long, value_name = "PATH")]
    pub command_path: Option<String>,

    /// Timeout of each administration command, e.g. 500ms or 3s [default: 10s]
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Read captured listings (servers.txt, sessions.txt, monitors.txt) instead
    /// of running the administration tool
    #[arg(long, value_name = "DIR")]
    pub from_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print parsed records and every problem before the summary
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

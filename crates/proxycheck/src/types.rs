//! Record, problem and configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Plugin severity, ordered from best to worst.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Nothing to report
    #[default]
    Ok,
    /// Degraded but serving
    Warning,
    /// Broken or about to break
    Critical,
    /// Could not determine
    Unknown,
}

impl Severity {
    /// Process exit code for this severity.
    pub fn exit_code(self) -> u8 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// What a problem is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    ServerCount,
    NoMaster,
    ServerStatus,
    ServerConnections,
    UnexpectedMaster,
    SessionCount,
    DuplicateSessionId,
    MonitorStatus,
    ProxyUnavailable,
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemKind::ServerCount => "server_count",
            ProblemKind::NoMaster => "no_master",
            ProblemKind::ServerStatus => "server_status",
            ProblemKind::ServerConnections => "server_connections",
            ProblemKind::UnexpectedMaster => "unexpected_master",
            ProblemKind::SessionCount => "session_count",
            ProblemKind::DuplicateSessionId => "duplicate_session_id",
            ProblemKind::MonitorStatus => "monitor_status",
            ProblemKind::ProxyUnavailable => "proxy_unavailable",
        };
        f.write_str(name)
    }
}

/// A single finding produced by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Which check raised it
    pub kind: ProblemKind,

    /// How bad it is
    pub severity: Severity,

    /// Human readable description
    pub message: String,
}

impl Problem {
    /// Create a warning problem
    pub fn warning(kind: ProblemKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create a critical problem
    pub fn critical(kind: ProblemKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Critical,
            message: message.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.kind, self.message)
    }
}

/// Backend server as listed by the administration tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub name: String,
    pub address: String,
    pub port: u16,

    /// Current connection count
    pub connections: u64,

    /// Status tags such as `Master`, `Slave`, `Synced`
    pub status: BTreeSet<String>,
}

impl ServerRecord {
    /// Whether the server carries the given status tag
    pub fn has_status(&self, tag: &str) -> bool {
        self.status.contains(tag)
    }
}

/// Client session routed through the proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque token, not guaranteed unique
    pub id: String,
    pub client: String,
    pub service: String,
    pub state: String,
}

/// Monitor process watching the backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRecord {
    pub name: String,
    pub status: String,
}

/// Everything parsed during one probe run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub servers: Vec<ServerRecord>,
    pub sessions: Vec<SessionRecord>,
    pub monitors: Vec<MonitorRecord>,
}

/// Field layout of the administration tool output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    delimiter: char,
}

impl Format {
    /// Human readable tables, `|` separated and padded
    pub const TABLE: Format = Format { delimiter: '|' };

    /// Machine readable rows, tab separated
    pub const TSV: Format = Format { delimiter: '\t' };

    /// Field delimiter
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }
}

/// Supported administration tools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTool {
    /// Legacy admin client, renders `|` tables
    #[default]
    Maxadmin,
    /// REST based client, renders TSV with `--tsv`
    Maxctrl,
}

impl AdminTool {
    /// Executable name looked up on PATH
    pub fn program(self) -> &'static str {
        match self {
            AdminTool::Maxadmin => "maxadmin",
            AdminTool::Maxctrl => "maxctrl",
        }
    }

    /// Output format the tool is invoked with
    pub fn format(self) -> Format {
        match self {
            AdminTool::Maxadmin => Format::TABLE,
            AdminTool::Maxctrl => Format::TSV,
        }
    }

    /// Arguments appended after `list <listing>`
    pub fn extra_args(self) -> &'static [&'static str] {
        match self {
            AdminTool::Maxadmin => &[],
            AdminTool::Maxctrl => &["--tsv"],
        }
    }
}

impl fmt::Display for AdminTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for AdminTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maxadmin" => Ok(AdminTool::Maxadmin),
            "maxctrl" => Ok(AdminTool::Maxctrl),
            other => Err(format!(
                "unknown administration tool '{other}' (expected maxadmin or maxctrl)"
            )),
        }
    }
}

/// Default connection threshold per server
pub const DEFAULT_MAX_CONNECTIONS: u64 = 500;

/// Default session threshold
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Limits the rule engine checks against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Number of backend servers that should be listed
    pub expected_servers: usize,

    /// Name of the server that should hold the Master role
    pub expected_master: Option<String>,

    /// Warn when a server has more connections than this
    pub max_connections: u64,

    /// Warn when there are more sessions than this
    pub max_sessions: usize,
}

impl Thresholds {
    /// Thresholds with default limits and no expected master
    pub fn new(expected_servers: usize) -> Self {
        Self {
            expected_servers,
            expected_master: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_expected_master(mut self, master: impl Into<String>) -> Self {
        self.expected_master = Some(master.into());
        self
    }

    pub fn with_max_connections(mut self, max_connections: u64) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }
}

//! Where listings come from.

use async_trait::async_trait;
use common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::types::AdminTool;

/// The three listings a probe run needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listing {
    Servers,
    Sessions,
    Monitors,
}

impl Listing {
    /// Name used on the administration command line
    pub fn as_str(self) -> &'static str {
        match self {
            Listing::Servers => "servers",
            Listing::Sessions => "sessions",
            Listing::Monitors => "monitors",
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of raw listing text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the raw text of one listing.
    ///
    /// Any failure means the proxy could not be queried; callers do not
    /// distinguish between causes.
    async fn fetch(&self, listing: Listing) -> Result<String>;
}

/// Default timeout for one administration command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the administration tool as a child process
#[derive(Debug, Clone)]
pub struct CommandSource {
    tool: AdminTool,
    program: String,
    timeout_duration: Duration,
}

impl CommandSource {
    /// Create a source running the tool found on PATH
    pub fn new(tool: AdminTool, timeout_duration: Duration) -> Self {
        Self {
            tool,
            program: tool.program().to_string(),
            timeout_duration,
        }
    }

    /// Run a different executable with the tool's arguments
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments passed for `listing`
    pub fn args(&self, listing: Listing) -> Vec<&'static str> {
        let mut args = vec!["list", listing.as_str()];
        args.extend_from_slice(self.tool.extra_args());
        args
    }

    /// Printable command line for `listing`
    pub fn command_line(&self, listing: Listing) -> String {
        format!("{} {}", self.program, self.args(listing).join(" "))
    }
}

#[async_trait]
impl ListingSource for CommandSource {
    async fn fetch(&self, listing: Listing) -> Result<String> {
        let start = Instant::now();
        let command_line = self.command_line(listing);

        let mut command = Command::new(&self.program);
        command
            .args(self.args(listing))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.timeout_duration, command.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                debug!(
                    command = %command_line,
                    bytes = output.stdout.len(),
                    duration_ms = start.elapsed().as_millis(),
                    "Administration command succeeded"
                );
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(command = %command_line, status = %output.status, "Administration command failed");
                Err(Error::command(
                    command_line,
                    format!("{} {}", output.status, stderr.trim()).trim_end(),
                ))
            }
            Ok(Err(e)) => {
                warn!(command = %command_line, error = %e, "Administration command could not be run");
                Err(Error::command(command_line, e))
            }
            Err(_) => {
                warn!(command = %command_line, "Administration command timed out");
                Err(Error::timeout(command_line, self.timeout_duration))
            }
        }
    }
}

/// Reads captured listings from `<dir>/<listing>.txt`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `listing`
    pub fn path(&self, listing: Listing) -> PathBuf {
        self.dir.join(format!("{listing}.txt"))
    }
}

#[async_trait]
impl ListingSource for DirectorySource {
    async fn fetch(&self, listing: Listing) -> Result<String> {
        let path = self.path(listing);
        debug!(path = %path.display(), "Reading captured listing");
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

/// In-memory listings, handy for tests and benchmarks
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    listings: HashMap<Listing, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `raw` for `listing`; listings never set fail to fetch
    pub fn with(mut self, listing: Listing, raw: impl Into<String>) -> Self {
        self.listings.insert(listing, raw.into());
        self
    }
}

#[async_trait]
impl ListingSource for StaticSource {
    async fn fetch(&self, listing: Listing) -> Result<String> {
        self.listings
            .get(&listing)
            .cloned()
            .ok_or_else(|| Error::other(format!("no {listing} listing available")))
    }
}

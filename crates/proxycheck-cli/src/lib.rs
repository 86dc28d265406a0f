//! Host program for the SQL proxy probe.
//!
//! Wraps [`proxycheck`] with the pieces a monitoring plugin needs: command
//! line parsing, an optional YAML configuration file and rendering of the
//! report as a plugin summary line or JSON.

pub mod cli;
pub mod config;
pub mod output;

pub use cli::{Cli, OutputFormat};
pub use config::{Config, ConfigError, Settings};

use proxycheck::{CommandSource, DirectorySource, Probe, Report};
use tracing::info;

/// Run one probe with the effective settings
pub async fn run(settings: &Settings) -> Report {
    let format = settings.tool.format();
    let thresholds = settings.thresholds.clone();

    if let Some(dir) = &settings.from_dir {
        info!(dir = %dir.display(), "Probing captured listings");
        return Probe::new(DirectorySource::new(dir), format, thresholds)
            .run()
            .await;
    }

    let mut source = CommandSource::new(settings.tool, settings.timeout);
    if let Some(path) = &settings.command_path {
        source = source.with_program(path.clone());
    }
    info!(tool = %settings.tool, timeout = ?settings.timeout, "Probing proxy");
    Probe::new(source, format, thresholds).run().await
}

//! check-sqlproxy binary

use clap::Parser;
use proxycheck::Severity;
use proxycheck_cli::{Cli, Config, Settings, output};
use std::process::ExitCode;

fn unknown(message: impl std::fmt::Display) -> ExitCode {
    println!("{} - {}", Severity::Unknown, message);
    ExitCode::from(Severity::Unknown.exit_code())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(Severity::Unknown.exit_code());
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    // Load configuration first (needed for logging settings)
    let config_path = Config::locate(cli.config.as_deref());
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => return unknown(e),
    };

    let level = config.logging.level.as_deref().unwrap_or("warn");
    match config.logging.format.as_deref() {
        Some("json") => common::logging::init_json(level),
        _ => common::logging::init(level),
    }
    match &config_path {
        Some(path) => tracing::info!("Loaded configuration from: {}", path.display()),
        None => tracing::info!("No configuration file found, using defaults"),
    }

    let settings = Settings::resolve(&cli, &config);
    tracing::debug!(?settings, "Resolved settings");

    let report = proxycheck_cli::run(&settings).await;

    match output::render(&report, settings.output, settings.verbose) {
        Ok(text) => {
            print!("{text}");
            ExitCode::from(report.exit_code())
        }
        Err(e) => unknown(e),
    }
}

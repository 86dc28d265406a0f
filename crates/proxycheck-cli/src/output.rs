//! Rendering of a probe report for the scheduler.

use crate::cli::OutputFormat;
use common::{Error, Result};
use proxycheck::{Inventory, Report};
use serde::Serialize;
use std::fmt::{self, Write};

#[derive(Serialize)]
struct JsonReport<'a> {
    exit_code: u8,
    #[serde(flatten)]
    report: &'a Report,
}

/// Render `report`; the summary line is always the last line.
pub fn render(report: &Report, format: OutputFormat, verbose: bool) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let doc = JsonReport {
                exit_code: report.exit_code(),
                report,
            };
            Ok(serde_json::to_string_pretty(&doc)? + "\n")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            if verbose {
                write_dump(&mut out, report).map_err(Error::other)?;
            }
            out.push_str(&report.verdict.summary);
            out.push('\n');
            Ok(out)
        }
    }
}

fn write_dump(out: &mut String, report: &Report) -> fmt::Result {
    match &report.inventory {
        Some(inventory) => write_inventory(out, inventory)?,
        None => writeln!(out, "No data retrieved from the administration tool")?,
    }

    writeln!(out, "Problems ({}):", report.problems.len())?;
    for problem in &report.problems {
        writeln!(out, "  {problem}")?;
    }
    Ok(())
}

fn write_inventory(out: &mut String, inventory: &Inventory) -> fmt::Result {
    writeln!(out, "Servers ({}):", inventory.servers.len())?;
    for server in &inventory.servers {
        let status: Vec<&str> = server.status.iter().map(String::as_str).collect();
        writeln!(
            out,
            "  {} {}:{} connections={} status={}",
            server.name,
            server.address,
            server.port,
            server.connections,
            status.join(",")
        )?;
    }

    writeln!(out, "Sessions ({}):", inventory.sessions.len())?;
    for session in &inventory.sessions {
        writeln!(
            out,
            "  {} client={} service={} state={}",
            session.id, session.client, session.service, session.state
        )?;
    }

    writeln!(out, "Monitors ({}):", inventory.monitors.len())?;
    for monitor in &inventory.monitors {
        writeln!(out, "  {} {}", monitor.name, monitor.status)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxycheck::{MonitorRecord, ServerRecord, Thresholds};

    fn report() -> Report {
        let inventory = Inventory {
            servers: vec![ServerRecord {
                name: "db1".into(),
                address: "10.0.0.1".into(),
                port: 3306,
                connections: 4,
                status: ["Master", "Synced"].into_iter().map(String::from).collect(),
            }],
            sessions: Vec::new(),
            monitors: vec![MonitorRecord {
                name: "galera".into(),
                status: "Stopped".into(),
            }],
        };
        Report::from_inventory(inventory, &Thresholds::new(1))
    }

    #[test]
    fn test_text_is_single_summary_line() {
        let out = render(&report(), OutputFormat::Text, false).unwrap();
        assert_eq!(out, "WARNING - monitor galera is Stopped\n");
    }

    #[test]
    fn test_verbose_dump_precedes_summary() {
        let out = render(&report(), OutputFormat::Text, true).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Servers (1):");
        assert_eq!(lines[1], "  db1 10.0.0.1:3306 connections=4 status=Master,Synced");
        assert_eq!(lines[2], "Sessions (0):");
        assert_eq!(lines[3], "Monitors (1):");
        assert_eq!(lines[4], "  galera Stopped");
        assert_eq!(lines[5], "Problems (1):");
        assert_eq!(lines[6], "  [WARNING] monitor_status: monitor galera is Stopped");
        assert_eq!(lines.last(), Some(&"WARNING - monitor galera is Stopped"));
    }

    #[test]
    fn test_verbose_unavailable() {
        let out = render(&Report::unavailable(), OutputFormat::Text, true).unwrap();
        assert!(out.starts_with("No data retrieved"));
        assert!(out.ends_with("CRITICAL - proxy does not seem to be running\n"));
    }

    #[test]
    fn test_json_output() {
        let out = render(&report(), OutputFormat::Json, false).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(doc["exit_code"], 1);
        assert_eq!(doc["verdict"]["severity"], "WARNING");
        assert_eq!(doc["verdict"]["summary"], "WARNING - monitor galera is Stopped");
        assert_eq!(doc["problems"][0]["kind"], "monitor_status");
        assert_eq!(doc["inventory"]["servers"][0]["port"], 3306);
    }
}

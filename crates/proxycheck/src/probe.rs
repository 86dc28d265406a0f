//! Probe driver: fetch, parse, evaluate, reduce.

use crate::checks;
use crate::parser;
use crate::source::{Listing, ListingSource};
use crate::types::{Format, Inventory, Problem, Thresholds};
use crate::verdict::Verdict;
use common::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of one probe run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Parsed records, absent when the proxy could not be queried
    pub inventory: Option<Inventory>,

    /// Every problem found, in evaluation order
    pub problems: Vec<Problem>,

    /// Reduced outcome
    pub verdict: Verdict,
}

impl Report {
    /// Evaluate an inventory against the thresholds
    pub fn from_inventory(inventory: Inventory, thresholds: &Thresholds) -> Self {
        let problems = checks::evaluate(&inventory, thresholds);
        let verdict = Verdict::from_problems(&problems);
        Self {
            inventory: Some(inventory),
            problems,
            verdict,
        }
    }

    /// Report for a proxy that could not be queried at all
    pub fn unavailable() -> Self {
        let problems = vec![checks::proxy_unavailable()];
        let verdict = Verdict::from_problems(&problems);
        Self {
            inventory: None,
            problems,
            verdict,
        }
    }

    /// Process exit code of the verdict
    pub fn exit_code(&self) -> u8 {
        self.verdict.exit_code()
    }
}

/// One-shot probe over a listing source
pub struct Probe<S> {
    source: S,
    format: Format,
    thresholds: Thresholds,
}

impl<S: ListingSource> Probe<S> {
    /// Create a new probe
    pub fn new(source: S, format: Format, thresholds: Thresholds) -> Self {
        Self {
            source,
            format,
            thresholds,
        }
    }

    /// Fetch and parse all listings, stopping at the first failed fetch.
    pub async fn collect(&self) -> Result<Inventory> {
        let servers = self.fetch(Listing::Servers).await?;
        let sessions = self.fetch(Listing::Sessions).await?;
        let monitors = self.fetch(Listing::Monitors).await?;

        Ok(parser::parse_inventory(
            &servers,
            &sessions,
            &monitors,
            self.format,
        ))
    }

    /// Run the probe to a report. Never fails: an unreachable proxy is itself
    /// reported as a critical problem.
    pub async fn run(&self) -> Report {
        let report = match self.collect().await {
            Ok(inventory) => Report::from_inventory(inventory, &self.thresholds),
            Err(e) => {
                warn!(error = %e, "Could not query proxy, skipping checks");
                Report::unavailable()
            }
        };

        info!(
            severity = %report.verdict.severity,
            problems = report.problems.len(),
            "Probe finished"
        );
        report
    }

    async fn fetch(&self, listing: Listing) -> Result<String> {
        let raw = self.source.fetch(listing).await?;
        debug!(%listing, lines = raw.lines().count(), "Fetched listing");
        Ok(raw)
    }
}

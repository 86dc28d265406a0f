//! Reduction of problems to a single plugin verdict.

use crate::types::{Problem, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary used when nothing was found
pub const OK_SUMMARY: &str = "OK - no problem detected";

/// Overall outcome of a probe run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Worst severity among all problems, OK when there are none
    pub severity: Severity,

    /// One line summary of the worst problems
    pub summary: String,
}

impl Verdict {
    /// Reduce a problem list to its verdict.
    ///
    /// The summary only lists the messages of the worst severity present,
    /// joined with `", "`, in the order the problems were raised.
    pub fn from_problems(problems: &[Problem]) -> Self {
        let severity = problems
            .iter()
            .map(|p| p.severity)
            .max()
            .unwrap_or(Severity::Ok);

        let summary = if severity == Severity::Ok {
            OK_SUMMARY.to_string()
        } else {
            let messages: Vec<&str> = problems
                .iter()
                .filter(|p| p.severity == severity)
                .map(|p| p.message.as_str())
                .collect();
            format!("{} - {}", severity, messages.join(", "))
        };

        Self { severity, summary }
    }

    /// Process exit code matching the severity
    pub fn exit_code(&self) -> u8 {
        self.severity.exit_code()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

//! Rule engine.
//!
//! Each check is a pure function of the parsed records and the configured
//! thresholds returning at most one problem. [`evaluate`] runs all of them and
//! collects the problems in a stable order.

use crate::types::{
    Inventory, MonitorRecord, Problem, ProblemKind, ServerRecord, SessionRecord, Thresholds,
};
use std::collections::HashSet;
use tracing::debug;

const MASTER: &str = "Master";
const SYNCED: &str = "Synced";
const DOWN: &str = "Down";
const MAINTENANCE: &str = "Maintenance";
const RUNNING: &str = "Running";

/// Zero servers is critical, any other mismatch with the expected count warns.
pub fn check_server_count(servers: &[ServerRecord], expected: usize) -> Option<Problem> {
    match servers.len() {
        0 => Some(Problem::critical(
            ProblemKind::ServerCount,
            "no backend server found",
        )),
        found if found != expected => Some(Problem::warning(
            ProblemKind::ServerCount,
            format!("found {found} backend servers, expected {expected}"),
        )),
        _ => None,
    }
}

/// At least one server must hold the Master role.
pub fn check_master_present(servers: &[ServerRecord]) -> Option<Problem> {
    if servers.iter().any(|s| s.has_status(MASTER)) {
        None
    } else {
        Some(Problem::critical(
            ProblemKind::NoMaster,
            "no backend server in Master mode",
        ))
    }
}

/// Reports only the first matching condition: Maintenance, Down, then not Synced.
pub fn check_server_status(server: &ServerRecord) -> Option<Problem> {
    if server.has_status(MAINTENANCE) {
        Some(Problem::warning(
            ProblemKind::ServerStatus,
            format!("server {} is in Maintenance", server.name),
        ))
    } else if server.has_status(DOWN) {
        Some(Problem::warning(
            ProblemKind::ServerStatus,
            format!("server {} is Down", server.name),
        ))
    } else if !server.has_status(SYNCED) {
        Some(Problem::critical(
            ProblemKind::ServerStatus,
            format!("server {} is not Synced", server.name),
        ))
    } else {
        None
    }
}

pub fn check_server_connections(server: &ServerRecord, max_connections: u64) -> Option<Problem> {
    (server.connections > max_connections).then(|| {
        Problem::warning(
            ProblemKind::ServerConnections,
            format!(
                "server {} has {} connections (threshold {})",
                server.name, server.connections, max_connections
            ),
        )
    })
}

/// Only meaningful for a server in Master mode when an expected master is set.
pub fn check_expected_master(server: &ServerRecord, expected: Option<&str>) -> Option<Problem> {
    let expected = expected?;
    if !server.has_status(MASTER) || server.name == expected {
        return None;
    }

    Some(Problem::warning(
        ProblemKind::UnexpectedMaster,
        format!("master is {}, expected {}", server.name, expected),
    ))
}

pub fn check_session_count(sessions: &[SessionRecord], max_sessions: usize) -> Option<Problem> {
    (sessions.len() > max_sessions).then(|| {
        Problem::warning(
            ProblemKind::SessionCount,
            format!("{} sessions (threshold {})", sessions.len(), max_sessions),
        )
    })
}

/// One aggregate warning, the colliding ids are not reported.
pub fn check_duplicate_sessions(sessions: &[SessionRecord]) -> Option<Problem> {
    let distinct: HashSet<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    (distinct.len() != sessions.len()).then(|| {
        Problem::warning(
            ProblemKind::DuplicateSessionId,
            "some sessions share the same id",
        )
    })
}

pub fn check_monitor_status(monitor: &MonitorRecord) -> Option<Problem> {
    (monitor.status != RUNNING).then(|| {
        Problem::warning(
            ProblemKind::MonitorStatus,
            format!("monitor {} is {}", monitor.name, monitor.status),
        )
    })
}

/// Raised instead of every other check when no listing could be retrieved.
pub fn proxy_unavailable() -> Problem {
    Problem::critical(
        ProblemKind::ProxyUnavailable,
        "proxy does not seem to be running",
    )
}

/// Server rules in display order
pub fn evaluate_servers(servers: &[ServerRecord], thresholds: &Thresholds) -> Vec<Problem> {
    let expected_master = thresholds.expected_master.as_deref();

    let mut problems: Vec<Problem> = check_server_count(servers, thresholds.expected_servers)
        .into_iter()
        .chain(check_master_present(servers))
        .collect();

    for server in servers {
        problems.extend(check_server_status(server));
        problems.extend(check_server_connections(server, thresholds.max_connections));
        problems.extend(check_expected_master(server, expected_master));
    }

    problems
}

pub fn evaluate_sessions(sessions: &[SessionRecord], thresholds: &Thresholds) -> Vec<Problem> {
    check_session_count(sessions, thresholds.max_sessions)
        .into_iter()
        .chain(check_duplicate_sessions(sessions))
        .collect()
}

pub fn evaluate_monitors(monitors: &[MonitorRecord]) -> Vec<Problem> {
    monitors.iter().filter_map(check_monitor_status).collect()
}

/// Run every rule over a parsed inventory.
pub fn evaluate(inventory: &Inventory, thresholds: &Thresholds) -> Vec<Problem> {
    let mut problems = evaluate_servers(&inventory.servers, thresholds);
    problems.extend(evaluate_sessions(&inventory.sessions, thresholds));
    problems.extend(evaluate_monitors(&inventory.monitors));

    debug!(
        servers = inventory.servers.len(),
        sessions = inventory.sessions.len(),
        monitors = inventory.monitors.len(),
        problems = problems.len(),
        "Evaluated inventory"
    );
    problems
}

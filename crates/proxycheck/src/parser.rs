//! Tolerant parsing of administration tool listings.
//!
//! Every line is split on the format delimiter and each field is trimmed.
//! Lines that cannot be turned into a record (banners, separators, column
//! headers, truncated rows) are skipped, so table padding and header rows never
//! need format specific handling.

use crate::types::{Format, Inventory, MonitorRecord, ServerRecord, SessionRecord};
use tracing::{debug, trace};

/// Builds a record from the trimmed positional fields of one line.
pub trait FromFields: Sized {
    /// Returns `None` when the fields do not describe a record.
    fn from_fields(fields: &[&str]) -> Option<Self>;
}

impl FromFields for ServerRecord {
    fn from_fields(fields: &[&str]) -> Option<Self> {
        let [name, address, port, connections, status, ..] = fields else {
            return None;
        };

        Some(Self {
            name: name.to_string(),
            address: address.to_string(),
            port: port.parse().ok()?,
            connections: connections.parse().ok()?,
            status: status
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl FromFields for SessionRecord {
    fn from_fields(fields: &[&str]) -> Option<Self> {
        let [id, client, service, state, ..] = fields else {
            return None;
        };

        Some(Self {
            id: id.to_string(),
            client: client.to_string(),
            service: service.to_string(),
            state: state.to_string(),
        })
    }
}

/// Column header value of the monitor status field.
const MONITOR_STATUS_HEADER: &str = "Status";

impl FromFields for MonitorRecord {
    fn from_fields(fields: &[&str]) -> Option<Self> {
        let [name, status, ..] = fields else {
            return None;
        };

        // Nothing numeric to fail on, so the header row is matched literally.
        if *status == MONITOR_STATUS_HEADER {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            status: status.to_string(),
        })
    }
}

/// Parse every decodable line of `raw`, preserving line order.
pub fn parse_records<T: FromFields>(raw: &str, format: Format) -> Vec<T> {
    let delimiter = format.delimiter();
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in raw.lines() {
        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        match T::from_fields(&fields) {
            Some(record) => records.push(record),
            None => {
                trace!(line, "Skipping undecodable line");
                skipped += 1;
            }
        }
    }

    debug!(
        records = records.len(),
        skipped,
        record_type = std::any::type_name::<T>(),
        "Parsed listing"
    );
    records
}

/// Parse a `list servers` listing
pub fn parse_servers(raw: &str, format: Format) -> Vec<ServerRecord> {
    parse_records(raw, format)
}

/// Parse a `list sessions` listing
pub fn parse_sessions(raw: &str, format: Format) -> Vec<SessionRecord> {
    parse_records(raw, format)
}

/// Parse a `list monitors` listing
pub fn parse_monitors(raw: &str, format: Format) -> Vec<MonitorRecord> {
    parse_records(raw, format)
}

/// Parse all three listings into an inventory
pub fn parse_inventory(servers: &str, sessions: &str, monitors: &str, format: Format) -> Inventory {
    Inventory {
        servers: parse_servers(servers, format),
        sessions: parse_sessions(sessions, format),
        monitors: parse_monitors(monitors, format),
    }
}

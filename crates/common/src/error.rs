//! Common error types for proxycheck components.

use std::fmt;
use std::time::Duration;

/// A specialized Result type for proxycheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for proxycheck operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The administration command ran but reported failure.
    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Command `{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Other(String),
}

impl Error {
    /// Create a new command failure error.
    pub fn command(command: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Error::Command {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(command: impl fmt::Display, timeout: Duration) -> Self {
        Error::Timeout {
            command: command.to_string(),
            timeout,
        }
    }

    /// Create a new other error.
    pub fn other(msg: impl fmt::Display) -> Self {
        Error::Other(msg.to_string())
    }
}

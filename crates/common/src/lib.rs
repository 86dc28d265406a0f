//! Common utilities and types shared across proxycheck components.

pub mod error;
pub mod logging;

pub use error::{Error, Result};

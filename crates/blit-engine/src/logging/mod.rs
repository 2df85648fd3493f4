//! Logging utilities.
//!
//! Centralizes logger initialization. The engine logs through the standard
//! `log` facade; this module only wires up a default backend.

mod init;

pub use init::{init_logging, LoggingConfig};

//! Logging utilities.
//!
//! Centralizes logger initialization. Code throughout the workspace logs
//! through the standard `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};

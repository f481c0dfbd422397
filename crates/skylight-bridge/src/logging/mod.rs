//! Logging utilities.
//!
//! Centralizes logger initialization. Only the standard `log` facade is
//! imposed on callers; the backend here is `env_logger` with a format suited
//! to a two-thread system.

mod init;

pub use init::{LoggingConfig, init_logging};

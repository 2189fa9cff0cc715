//! Logging utilities.
//!
//! Centralizes logger initialization behind the standard `log` facade so the
//! studio shell can set it up once, early in `main`.

mod init;

pub use init::{LoggingConfig, init_logging};

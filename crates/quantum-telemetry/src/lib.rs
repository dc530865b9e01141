//! # Quantum Telemetry
//!
//! Logging bootstrap shared by every Quantum-Chain binary and test harness.
//! Library crates only emit `tracing` events; this crate decides where they
//! go.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> Result<(), quantum_telemetry::TelemetryError> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QC_SERVICE_NAME` | `quantum-chain` | Service name in logs |
//! | `QC_LOG_LEVEL` | `info` | Log level or `EnvFilter` directive |
//! | `QC_LOG_JSON` | `false` | JSON output instead of pretty text |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

//! Pulse Telemetry - logging setup for the Pulse presence client.
//!
//! Wraps `tracing-subscriber` with a serializable [`LogConfig`]: level and
//! per-crate directives, output format, and a stdout, stderr, or rolling
//! file target.
//!
//! # Example
//!
//! ```rust,no_run
//! use pulse_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), pulse_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("pulse_gateway=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```
//!
//! With the `config` feature, a [`LogConfig`] can be built from
//! `pulse_config::LoggingSection`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};

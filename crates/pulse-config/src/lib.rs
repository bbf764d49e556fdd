#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Layered configuration for the Pulse presence client.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pulse_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("Gateway: {}", resolved.config.gateway.url);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** (`pulse --config PATH`)
//! 2. **User** (`~/.pulse/config.toml`)
//! 3. **Environment variables** (`PULSE_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! # Design
//!
//! This crate has **no dependencies on other internal pulse crates**.
//! Conversion to engine types happens in the front-end's bridge module.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered merging with source tracking.
pub mod merge;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

use std::path::Path;

pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use merge::ConfigLayer;
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a file is unreadable or malformed, or if
    /// the merged result fails validation.
    pub fn load(config_file: Option<&Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(config_file, None)
    }

    /// Load with a custom `~/.pulse` directory.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_home(
        config_file: Option<&Path>,
        pulse_home: &Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(config_file, Some(pulse_home))
    }
}

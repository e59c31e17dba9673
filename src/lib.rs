//! Xuckoo Library
//!
//! An extendible cuckoo hash table for 64-bit keys, together with the
//! configuration, error handling and command-script driver used by the
//! `xuckoo` binary.
//!
//! # Architecture
//!
//! - [`data_structures::xuckoo_hash`] holds the table: two extendible hash
//!   directories, a cuckoo displacement protocol between them, and bucket
//!   splitting when displacement cycles
//! - [`config`] loads layered settings from defaults, files and the environment
//! - [`error`] defines the crate-wide error type and error reporting
//! - [`script`] runs line-oriented command scripts against a table

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;
pub mod script;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Xuckoo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Installs the tracing error reporter and loads the global configuration
/// from the default location, falling back to built-in defaults.
pub fn init() -> error::XuckooResult<()> {
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));
    config::init_default_config()?;
    Ok(())
}

//! Error module for Xuckoo.
//!
//! This module provides the crate-wide error type, the context attached to
//! reported errors, and a pluggable reporter that forwards errors to the
//! tracing framework by default.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::data_structures::xuckoo_hash::XuckooHashError;

pub mod config;
pub mod script;

/// Result type alias used throughout Xuckoo.
pub type XuckooResult<T> = Result<T, XuckooError>;

/// Core error enum for Xuckoo.
#[derive(Error, Debug)]
pub enum XuckooError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by the hash table itself.
    #[error("Table error: {0}")]
    Table(#[from] XuckooHashError),

    /// Errors in a command script.
    #[error("Script error: {0}")]
    Script(#[from] script::ScriptError),

    /// IO errors that may occur while reading scripts or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors when rendering JSON reports.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: XuckooError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,

    /// Span trace captured where the error was reported, if any.
    pub trace: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: XuckooError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
            trace: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attaches the current tracing span trace.
    ///
    /// Requires a subscriber with `tracing_error::ErrorLayer` installed;
    /// otherwise the trace is left empty.
    pub fn with_span_trace(mut self) -> Self {
        let trace = SpanTrace::capture().to_string();
        if !trace.is_empty() {
            self.trace = Some(trace);
        }
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// A simple error reporter implementation that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            trace = context.trace.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// Process-wide error reporter, set at most once.
static ERROR_REPORTER: OnceCell<Arc<dyn ErrorReporter>> = OnceCell::new();

/// Set the global error reporter.
///
/// Returns `false` if a reporter was already installed; the existing one is kept.
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) -> bool {
    ERROR_REPORTER.set(reporter).is_ok()
}

/// Report an error through the global reporter.
///
/// Falls back to standard error when no reporter is installed.
pub fn report_error(context: ErrorContext) {
    match ERROR_REPORTER.get() {
        Some(reporter) => reporter.report(context),
        None => eprintln!("Error: {context}"),
    }
}

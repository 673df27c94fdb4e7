//! Core error types for block splicing
//!
//! `RenderFailure` is what a rendering backend reports for a single diagram.
//! It never escapes the block boundary. `SpliceError` covers everything else
//! and is what degrades a whole document.

use std::fmt;

use thiserror::Error;

/// Placeholder used when a failure carries no message
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A rendering backend rejected a diagram
///
/// The message is optional: backends that fail without saying why produce
/// a failure that reports [`UNKNOWN_ERROR`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    message: Option<String>,
}

impl RenderFailure {
    /// Create a failure with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Create a failure that carries no message
    pub fn unknown() -> Self {
        Self { message: None }
    }

    /// The failure message, or [`UNKNOWN_ERROR`] when it is missing or blank
    pub fn message(&self) -> &str {
        match self.message.as_deref() {
            Some(message) if !message.trim().is_empty() => message,
            _ => UNKNOWN_ERROR,
        }
    }

    /// Whether the backend supplied a usable message
    pub fn has_message(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|message| !message.trim().is_empty())
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for RenderFailure {}

impl From<anyhow::Error> for RenderFailure {
    fn from(error: anyhow::Error) -> Self {
        Self::new(error.to_string())
    }
}

impl From<String> for RenderFailure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for RenderFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors that abort splicing a whole document
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("Scan error: {message}")]
    ScanError { message: String },

    #[error("Invalid block span {start}..{end} in document of length {len}")]
    InvalidSpan { start: usize, end: usize, len: usize },

    #[error("Render error: {source}")]
    RenderError {
        #[from]
        source: RenderFailure,
    },

    #[error("Failed to start renderer '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Panic: {message}")]
    Panic { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl SpliceError {
    /// Create a new scan error
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }

    /// Create a new invalid span error
    pub fn invalid_span(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidSpan { start, end, len }
    }

    /// Create a panic error from a caught panic payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        Self::Panic {
            message: panic_message(payload),
        }
    }
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    }
}

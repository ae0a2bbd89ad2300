//! Error types for pcbsvg operations.
//!
//! This module provides the main error type [`PcbSvgError`]. Rendering itself
//! never fails; errors come from reading circuit JSON and from options.

use std::io;

use thiserror::Error;

/// The main error type for pcbsvg operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the `serde_json` error,
/// whose line and column can be turned into a labeled span for rich error
/// reporting.
#[derive(Debug, Error)]
pub enum PcbSvgError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PcbSvgError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

//! Error types for ocelgraph operations.
//!
//! This module provides the main error type [`OcelGraphError`] which wraps
//! the error conditions that can occur while turning a summary into a
//! rendered graph.

use std::io;

use thiserror::Error;

use crate::structure::Diagnostic;

/// The main error type for ocelgraph operations.
///
/// An empty summary is not an error. Malformed input only surfaces here when
/// the `reject` input policy is configured; under the default `skip` policy
/// it is reported through [`Diagnostic`]s on the layout result instead.
#[derive(Debug, Error)]
pub enum OcelGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Malformed input: {0}")]
    MalformedInput(Diagnostic),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for OcelGraphError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl OcelGraphError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

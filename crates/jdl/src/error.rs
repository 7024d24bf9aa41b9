//! Error types for JDL imports.
//!
//! This module provides the main error type [`JdlError`] which wraps the
//! failures of every stage of an import.

use std::{io, path::PathBuf};

use thiserror::Error;

use jdl_parser::{ParseError, RuntimeError};

use crate::validate::ValidationError;

/// The main error type for JDL imports.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the source text next to the diagnostic so
/// that callers can render the offending span.
#[derive(Debug, Error)]
pub enum JdlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Vocabulary error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for JdlError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl JdlError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

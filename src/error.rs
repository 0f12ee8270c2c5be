//! Error handling for SWMM section assembly.
//!
//! Provides error types with context for section parsing, category lookup,
//! geometry reconstruction and table joining failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwmmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Model file not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("Unknown element category: {category}")]
    UnknownCategory { category: String },

    #[error("Malformed [{section}] section in {path} at line {line}: {reason}")]
    SectionParse {
        path: PathBuf,
        section: String,
        line: usize,
        reason: String,
    },

    #[error("Missing coordinate for node '{node}' referenced by element '{element}'")]
    MissingCoordinate { element: String, node: String },

    #[error("Link '{element}' has no {column}")]
    MissingEndpoint { element: String, column: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for category '{category}': {reason}")]
    ProcessingFailed { category: String, reason: String },
}

impl SwmmError {
    pub fn section_parse(
        path: impl Into<PathBuf>,
        section: impl Into<String>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::SectionParse {
            path: path.into(),
            section: section.into(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwmmError>;

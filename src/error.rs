//! Error types for coverage-ideogram.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdeogramError {
    /// Interval with `start >= end`; rejected per record.
    #[error("Malformed interval {chrom}:{start}-{end} (start must be < end)")]
    MalformedInterval { chrom: String, start: u64, end: u64 },

    /// None of chr1..chr22, chrX, chrY is present in the reference.
    #[error("No displayable chromosomes (chr1-chr22, chrX, chrY) found in the reference")]
    EmptyInput,

    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl IdeogramError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IdeogramError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, IdeogramError>;

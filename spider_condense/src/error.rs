//! Errors surfaced by the condense pipeline.
//!
//! The classifier and the deduplication engine are total and never fail;
//! only configuration and output handling can.

/// Errors from configuring or running the pipeline.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An extra generated-identifier pattern did not compile.
    #[error("invalid identifier pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// The configuration holds a value the pipeline cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A configuration file could not be decoded.
    #[error("configuration decode error: {0}")]
    Json(#[from] serde_json::Error),
    /// An I/O error while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

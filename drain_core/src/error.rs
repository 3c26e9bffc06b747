//! Error types for the drain_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for drain_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A measurement field did not parse as a number
    #[error("Please enter a valid number for {field}: {input:?}")]
    InvalidNumber { field: &'static str, input: String },

    /// A measurement parsed but is not physically meaningful
    #[error("{field} must be a finite, non-negative number (got {value})")]
    OutOfRange { field: &'static str, value: f64 },

    /// A persisted entry does not follow the record layout
    #[error("Malformed ledger entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    /// The ledger file exists but could not be decoded
    #[error("Ledger file {path:?} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// True for errors caused by bad user input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidNumber { .. } | Error::OutOfRange { .. })
    }
}

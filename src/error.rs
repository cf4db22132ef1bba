//! Error types for configuration loading and high-score persistence.
//!
//! The simulation itself never fails; only the I/O at its edges does.

/// Error type for everything outside the frame loop
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO error from the filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a config or score file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for fallible operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for dataset preprocessing.

use thiserror::Error;

/// Result type for preprocessing operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Error type for preprocessing operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PrepError {
    /// An entity record could not be split into a tag and a value.
    #[error("malformed entity record: {0:?}")]
    MalformedRecord(String),

    /// One of two paired input streams ended before the other.
    #[error("misaligned input streams: {0}")]
    MisalignedStreams(String),

    /// An empty line was found where content is required.
    #[error("empty line {line} in {file}")]
    EmptyLine { line: usize, file: String },

    /// The external tokenizer could not be run or exited with failure.
    #[error("tokenizer failed: {0}")]
    ExternalTool(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

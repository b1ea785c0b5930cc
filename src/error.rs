//! Error types for stream construction and decoding.
//!
//! Only construction-time and configuration problems are reported through
//! [`Error`]. Once a pipeline is built, decode and tokenize conditions are
//! signalled in-band (end-of-stream `None`, zero-length reads, sticky filter
//! status, `Object::Error` tokens) so a single corrupt stream cannot abort
//! processing of the rest of the document.

/// Result type alias for stream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or driving a stream pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error from a file-backed source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported stream filter name
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Operation the concrete stream cannot perform (e.g. seeking a filter)
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Decode parameters rejected at construction time
    #[error("Invalid decode parameters: {0}")]
    InvalidParams(String),

    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),
}

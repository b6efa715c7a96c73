//! Error types for the salvage pipeline.
//!
//! Hard failures are rare: the fallback engine degrades gracefully and reports
//! recoverable conditions as [`ExtractionWarning`] values instead of errors.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while salvaging text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input exceeds the configured size limit (the only fatal extraction condition)
    #[error("Input too large: {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Decompressed output grew beyond the configured cap
    #[error("Decompressed size exceeds limit of {0} bytes")]
    InflateLimitExceeded(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet or office container error
    #[error("Office document error: {0}")]
    Office(String),
}

/// Advisory diagnostics collected during an extraction.
///
/// Warnings never change the returned text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionWarning {
    /// No `stream ... endstream` block was found
    #[error("no stream blocks found")]
    NoStreamBlocks,

    /// Blocks exist but none was flagged as FlateDecode
    #[error("no flate blocks found")]
    NoFlateBlocks,

    /// Every inflate attempt failed for a flagged block
    #[error("inflate failed for block {block}: {reason}")]
    InflateFailed {
        /// Zero-based block index in document order
        block: usize,
        /// Last decoder error
        reason: String,
    },

    /// Inflated output grew beyond the configured cap
    #[error("inflate for block {block} exceeded {limit} bytes")]
    InflateLimitExceeded {
        /// Zero-based block index in document order
        block: usize,
        /// Configured cap in bytes
        limit: usize,
    },

    /// The whole pipeline produced no text
    #[error("no extractable text found; the PDF may be image-based or heavily encoded")]
    NoTextFound,
}

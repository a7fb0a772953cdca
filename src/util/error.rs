//! Error types for detpost.

use thiserror::Error;

/// Result alias for detpost operations.
pub type DetPostResult<T> = std::result::Result<T, DetPostError>;

/// Errors that can occur when post-processing detector output.
///
/// Per-candidate rejections (low confidence, degenerate boxes, unknown
/// labels) are not errors; they are filtered silently during decoding.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DetPostError {
    /// A geometry or configuration parameter is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The tensor or label table cannot be decoded with the current layout.
    #[error("shape mismatch: {reason}")]
    ShapeMismatch {
        /// Which shape requirement was violated.
        reason: &'static str,
    },
    /// Tensor dimensions are zero or overflow.
    #[error("invalid tensor dimensions: {candidates}x{attributes}")]
    InvalidDimensions {
        /// Number of candidates (rows).
        candidates: usize,
        /// Number of attributes per candidate.
        attributes: usize,
    },
    /// The backing buffer is shorter than the declared shape.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall {
        /// Required number of elements.
        needed: usize,
        /// Provided number of elements.
        got: usize,
    },
    /// A label file could not be read.
    #[error("label io: {reason}")]
    LabelIo {
        /// Underlying I/O failure.
        reason: String,
    },
    /// An image could not be loaded or decoded.
    #[error("image io: {reason}")]
    ImageIo {
        /// Underlying decoder failure.
        reason: String,
    },
}

//! Decoded detections and their pruning.
//!
//! Includes the immutable `Detection` value and class-aware non-maximum
//! suppression.

pub(crate) mod detection;
pub(crate) mod nms;

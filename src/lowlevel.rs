//! Low-level building blocks for custom post-processing pipelines.
//!
//! These expose the per-candidate pieces used by the decoder for hosts that
//! want to assemble their own loop. Most users should prefer `Pipeline`.

pub use crate::decode::best_class;
pub use crate::geometry::letterbox::{to_input_coords, to_original_coords};
pub use crate::geometry::{iou, BoundingBox};
pub use crate::tensor::{CandidateRef, BOX_ATTRIBUTES};

//! detpost turns raw single-stage detector output into final detections.
//!
//! The pipeline decodes each candidate row of the output tensor, maps its box
//! back through the letterbox transform into original-image pixels, and runs
//! class-aware non-maximum suppression. Parallel decoding is available via
//! the `rayon` feature and input preparation via `image-io`.

pub mod decode;
pub mod geometry;
#[cfg(feature = "image-io")]
pub mod image;
pub mod labels;
pub mod lowlevel;
pub mod pipeline;
pub mod tensor;
pub(crate) mod trace;
pub mod util;

mod candidate;

pub use candidate::detection::Detection;
pub use candidate::nms::suppress;
pub use decode::observer::{
    CandidateEvent, CandidateOutcome, DecodeObserver, DecodeStats, NoopObserver, Rejection,
};
pub use decode::{decode, decode_with_observer, CoordSpace, DecodeConfig};
pub use geometry::letterbox::{compute_params, to_input_coords, to_original_coords, LetterboxParams};
pub use geometry::{iou, BoundingBox};
pub use labels::{LabelTable, UNKNOWN_LABEL};
pub use pipeline::{Pipeline, PipelineConfig};
pub use tensor::{OwnedTensor, TensorLayout, TensorView};
pub use util::{DetPostError, DetPostResult};

#[cfg(feature = "rayon")]
pub use decode::par::decode_par;

#[cfg(feature = "image-io")]
pub use crate::image::io::load_rgb_image;
#[cfg(feature = "image-io")]
pub use crate::image::letterbox::letterbox_rgb;

//! Input preparation matching the decoder's letterbox mapping.
//!
//! Available when the `image-io` feature is enabled. The network itself is
//! external; these helpers only produce the normalized `[S][S][3]` buffer it
//! consumes, laid out exactly as [`LetterboxParams`] describes.
//!
//! [`LetterboxParams`]: crate::geometry::letterbox::LetterboxParams

pub mod io;
pub mod letterbox;

//! Convenience helpers for loading images via the `image` crate.

use crate::util::{DetPostError, DetPostResult};
use ::image::RgbImage;
use std::path::Path;

/// Loads an image from disk and converts it to 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> DetPostResult<RgbImage> {
    let img = ::image::open(path).map_err(|err| DetPostError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}

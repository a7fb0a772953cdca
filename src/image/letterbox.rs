//! Resize-and-pad an RGB image into a normalized network input buffer.

use crate::geometry::letterbox::LetterboxParams;
use crate::util::{DetPostError, DetPostResult};
use ::image::imageops::{self, FilterType};
use ::image::RgbImage;

/// Produces an HWC `f32` buffer of `input_size * input_size * 3` values.
///
/// The image is resized to `final_width x final_height`, placed at
/// `(offset_x, offset_y)` on a black canvas, and scaled to `[0, 1]`.
pub fn letterbox_rgb(img: &RgbImage, params: &LetterboxParams) -> DetPostResult<Vec<f32>> {
    if img.width() != params.original_width || img.height() != params.original_height {
        return Err(DetPostError::InvalidArgument(
            "image size does not match letterbox parameters",
        ));
    }

    let size = params.input_size as usize;
    let mut out = vec![0.0f32; size * size * 3];
    let resized = if img.width() == params.final_width && img.height() == params.final_height {
        img.clone()
    } else {
        imageops::resize(img, params.final_width, params.final_height, FilterType::Triangle)
    };

    let ox = params.offset_x as usize;
    let oy = params.offset_y as usize;
    for (x, y, pixel) in resized.enumerate_pixels() {
        let idx = ((oy + y as usize) * size + ox + x as usize) * 3;
        for (c, value) in pixel.0.iter().enumerate() {
            out[idx + c] = *value as f32 / 255.0;
        }
    }
    Ok(out)
}

//! Mapping between original-image pixels and the square network input.
//!
//! With aspect-ratio correction the longer original axis is scaled to
//! `input_size` and the shorter one is centered with symmetric padding. The
//! padding before the content is stored as `offset_x`/`offset_y`. Without
//! correction both axes are stretched independently and no padding exists.

use crate::util::{DetPostError, DetPostResult};

/// Resize-and-pad parameters for one original image size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LetterboxParams {
    /// Side length of the square network input.
    pub input_size: u32,
    /// Width of the original image.
    pub original_width: u32,
    /// Height of the original image.
    pub original_height: u32,
    /// Width of the resized content inside the input canvas.
    pub final_width: u32,
    /// Height of the resized content inside the input canvas.
    pub final_height: u32,
    /// Padding columns before the content.
    pub offset_x: u32,
    /// Padding rows before the content.
    pub offset_y: u32,
    /// Original pixels per content pixel along x.
    ///
    /// With aspect-ratio correction the shorter axis is rounded to whole
    /// pixels, so `scale_x` and `scale_y` may differ slightly (641x17 into
    /// 640 gives 1.0015625 and 1.0). Each axis keeps its own ratio so that
    /// the content edges map exactly onto the image edges.
    pub scale_x: f32,
    /// Original pixels per content pixel along y.
    pub scale_y: f32,
    /// Whether the content was letterboxed (aspect ratio preserved).
    pub aspect_ratio_correction: bool,
}

/// Computes letterbox parameters for an original image of the given size.
///
/// Fails with `InvalidArgument` when any dimension is zero.
pub fn compute_params(
    original_width: u32,
    original_height: u32,
    input_size: u32,
    aspect_ratio_correction: bool,
) -> DetPostResult<LetterboxParams> {
    if original_width == 0 || original_height == 0 {
        return Err(DetPostError::InvalidArgument(
            "original image dimensions must be positive",
        ));
    }
    if input_size == 0 {
        return Err(DetPostError::InvalidArgument("input size must be positive"));
    }

    let (final_width, final_height) = if aspect_ratio_correction {
        fit_inside(original_width, original_height, input_size)
    } else {
        (input_size, input_size)
    };
    let (offset_x, offset_y) = if aspect_ratio_correction {
        ((input_size - final_width) / 2, (input_size - final_height) / 2)
    } else {
        (0, 0)
    };

    Ok(LetterboxParams {
        input_size,
        original_width,
        original_height,
        final_width,
        final_height,
        offset_x,
        offset_y,
        scale_x: original_width as f32 / final_width as f32,
        scale_y: original_height as f32 / final_height as f32,
        aspect_ratio_correction,
    })
}

/// Scales the longer axis to `input_size`; the shorter axis keeps the ratio.
fn fit_inside(width: u32, height: u32, input_size: u32) -> (u32, u32) {
    let shorter_to = |short: u32, long: u32| -> u32 {
        let scaled = (short as f64 * input_size as f64 / long as f64).round() as u32;
        scaled.clamp(1, input_size)
    };
    if width >= height {
        (input_size, shorter_to(height, width))
    } else {
        (shorter_to(width, height), input_size)
    }
}

/// Maps a point from input pixels to original-image pixels.
///
/// Subtracts the padding offset, then applies the per-axis scale. The ratio is
/// evaluated in `f64` so the canvas corners land exactly on the image corners.
pub fn to_original_coords(params: &LetterboxParams, x: f32, y: f32) -> (f32, f32) {
    let ox = (x as f64 - params.offset_x as f64) * params.original_width as f64
        / params.final_width as f64;
    let oy = (y as f64 - params.offset_y as f64) * params.original_height as f64
        / params.final_height as f64;
    (ox as f32, oy as f32)
}

/// Maps a point from original-image pixels to input pixels.
pub fn to_input_coords(params: &LetterboxParams, x: f32, y: f32) -> (f32, f32) {
    let ix = x as f64 * params.final_width as f64 / params.original_width as f64
        + params.offset_x as f64;
    let iy = y as f64 * params.final_height as f64 / params.original_height as f64
        + params.offset_y as f64;
    (ix as f32, iy as f32)
}

#[cfg(test)]
mod tests {
    use super::{compute_params, to_input_coords, to_original_coords};
    use crate::util::DetPostError;

    #[test]
    fn landscape_is_padded_vertically() {
        let params = compute_params(1280, 720, 640, true).unwrap();
        assert_eq!(params.final_width, 640);
        assert_eq!(params.final_height, 360);
        assert_eq!(params.offset_x, 0);
        assert_eq!(params.offset_y, 140);
        assert!((params.scale_x - 2.0).abs() < 1e-6);
        assert!((params.scale_y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn portrait_is_padded_horizontally() {
        let params = compute_params(480, 640, 640, true).unwrap();
        assert_eq!((params.final_width, params.final_height), (480, 640));
        assert_eq!((params.offset_x, params.offset_y), (80, 0));
        let (x, y) = to_original_coords(&params, 80.0, 0.0);
        assert_eq!((x, y), (0.0, 0.0));
        let (x, y) = to_original_coords(&params, 560.0, 640.0);
        assert_eq!((x, y), (480.0, 640.0));
    }

    #[test]
    fn stretch_mode_has_no_offset() {
        let params = compute_params(333, 517, 640, false).unwrap();
        assert_eq!((params.final_width, params.final_height), (640, 640));
        assert_eq!((params.offset_x, params.offset_y), (0, 0));
        assert_eq!(to_original_coords(&params, 0.0, 0.0), (0.0, 0.0));
        assert_eq!(to_original_coords(&params, 640.0, 640.0), (333.0, 517.0));
    }

    #[test]
    fn rounded_axis_keeps_its_own_scale() {
        let params = compute_params(641, 17, 640, true).unwrap();
        assert_eq!((params.final_width, params.final_height), (640, 17));
        assert!((params.scale_x - 641.0 / 640.0).abs() < 1e-6);
        assert_eq!(params.scale_y, 1.0);
        let (x, y) = to_original_coords(
            &params,
            (params.offset_x + params.final_width) as f32,
            (params.offset_y + params.final_height) as f32,
        );
        assert_eq!((x, y), (641.0, 17.0));
    }

    #[test]
    fn inverse_mapping_round_trips() {
        let params = compute_params(1000, 300, 640, true).unwrap();
        let (ix, iy) = to_input_coords(&params, 250.0, 150.0);
        let (ox, oy) = to_original_coords(&params, ix, iy);
        assert!((ox - 250.0).abs() < 1e-3);
        assert!((oy - 150.0).abs() < 1e-3);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = compute_params(0, 10, 640, true).unwrap_err();
        assert!(matches!(err, DetPostError::InvalidArgument(_)));
        let err = compute_params(10, 10, 0, false).unwrap_err();
        assert!(matches!(err, DetPostError::InvalidArgument(_)));
    }
}

//! Candidate decoding from raw detector output.
//!
//! Each tensor row is reduced to its best class, filtered by confidence,
//! mapped from input pixels back through the letterbox into original-image
//! pixels, clamped, and labeled. Rows that fail any check are dropped
//! silently; only malformed inputs are errors.

pub mod observer;
#[cfg(feature = "rayon")]
pub mod par;

use crate::candidate::detection::Detection;
use crate::geometry::letterbox::{to_original_coords, LetterboxParams};
use crate::geometry::BoundingBox;
use crate::labels::LabelTable;
use crate::tensor::{CandidateRef, TensorView, BOX_ATTRIBUTES};
use crate::trace::{trace_event, trace_span};
use crate::util::{DetPostError, DetPostResult};
use observer::{CandidateEvent, CandidateOutcome, DecodeObserver, NoopObserver, Rejection};

/// Units of the box columns in the tensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordSpace {
    /// Pixels of the square network input (e.g. 0..640).
    #[default]
    InputPixels,
    /// Fractions of the input side (0..1); scaled by `input_size` first.
    Normalized,
}

/// Per-call decoding options.
#[derive(Clone, Copy, Debug)]
pub struct DecodeConfig {
    /// Rows whose best class score is below this are dropped.
    pub confidence_threshold: f32,
    /// Units of the box columns.
    pub coord_space: CoordSpace,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            coord_space: CoordSpace::InputPixels,
        }
    }
}

/// Decodes every candidate row into detections, in tensor row order.
///
/// Fails with `ShapeMismatch` when the tensor has no class columns or the
/// label table is empty. No count limit is applied here.
pub fn decode(
    tensor: TensorView<'_>,
    params: &LetterboxParams,
    labels: &LabelTable,
    config: &DecodeConfig,
) -> DetPostResult<Vec<Detection>> {
    decode_with_observer(tensor, params, labels, config, &mut NoopObserver)
}

/// Like [`decode`], reporting every row's outcome to `observer`.
pub fn decode_with_observer(
    tensor: TensorView<'_>,
    params: &LetterboxParams,
    labels: &LabelTable,
    config: &DecodeConfig,
    observer: &mut dyn DecodeObserver,
) -> DetPostResult<Vec<Detection>> {
    let num_scan = scan_width(tensor, labels)?;
    let _span = trace_span!(
        "decode",
        candidates = tensor.num_candidates(),
        classes = num_scan
    )
    .entered();

    let mut out = Vec::new();
    for index in 0..tensor.num_candidates() {
        let Some(candidate) = tensor.candidate(index) else {
            break;
        };
        let decoded = decode_candidate(candidate, params, labels, config, num_scan);
        match decoded.result {
            Ok(det) => {
                observer.on_candidate(&CandidateEvent {
                    index,
                    confidence: decoded.confidence,
                    class_id: decoded.class_id,
                    outcome: CandidateOutcome::Accepted(&det),
                });
                out.push(det);
            }
            Err(rejection) => observer.on_candidate(&CandidateEvent {
                index,
                confidence: decoded.confidence,
                class_id: decoded.class_id,
                outcome: CandidateOutcome::Rejected(rejection),
            }),
        }
    }

    trace_event!("decoded_candidates", count = out.len());
    Ok(out)
}

/// Validates the inputs and returns how many class columns to scan.
///
/// Columns beyond the label table are never considered, so a table shorter
/// than the model's class count hides the extra classes instead of failing.
pub(crate) fn scan_width(tensor: TensorView<'_>, labels: &LabelTable) -> DetPostResult<usize> {
    if tensor.num_attributes() < BOX_ATTRIBUTES + 1 {
        return Err(DetPostError::ShapeMismatch {
            reason: "tensor needs at least one class column after the 4 box columns",
        });
    }
    if labels.is_empty() {
        return Err(DetPostError::ShapeMismatch {
            reason: "label table is empty",
        });
    }
    Ok(tensor.num_classes().min(labels.len()))
}

/// Finds the highest positive class score among the first `num_scan` classes.
///
/// Ties keep the lowest class id. Returns `(0.0, -1)` when no score is
/// greater than zero.
pub fn best_class(candidate: CandidateRef<'_>, num_scan: usize) -> (f32, i32) {
    let mut max_confidence = 0.0f32;
    let mut best_class_id = -1i32;
    for class_id in 0..num_scan {
        let Some(score) = candidate.class_score(class_id) else {
            break;
        };
        if score > max_confidence {
            max_confidence = score;
            best_class_id = class_id as i32;
        }
    }
    (max_confidence, best_class_id)
}

pub(crate) struct DecodedCandidate {
    pub(crate) confidence: f32,
    pub(crate) class_id: i32,
    pub(crate) result: Result<Detection, Rejection>,
}

pub(crate) fn decode_candidate(
    candidate: CandidateRef<'_>,
    params: &LetterboxParams,
    labels: &LabelTable,
    config: &DecodeConfig,
    num_scan: usize,
) -> DecodedCandidate {
    let (confidence, class_id) = best_class(candidate, num_scan);
    let result = project_candidate(candidate, params, config, confidence).map(|bounding_box| {
        Detection::new(bounding_box, labels.get(class_id), confidence, class_id)
    });
    DecodedCandidate {
        confidence,
        class_id,
        result,
    }
}

fn project_candidate(
    candidate: CandidateRef<'_>,
    params: &LetterboxParams,
    config: &DecodeConfig,
    confidence: f32,
) -> Result<BoundingBox, Rejection> {
    if confidence < config.confidence_threshold {
        return Err(Rejection::LowConfidence);
    }

    let (mut cx, mut cy, mut w, mut h) = candidate.box_params();
    if config.coord_space == CoordSpace::Normalized {
        let size = params.input_size as f32;
        cx *= size;
        cy *= size;
        w *= size;
        h *= size;
    }
    let input_box = BoundingBox::from_center(cx, cy, w, h);

    if params.aspect_ratio_correction {
        let ox = params.offset_x as f32;
        let oy = params.offset_y as f32;
        let content = BoundingBox::new(
            input_box.left - ox,
            input_box.top - oy,
            input_box.right - ox,
            input_box.bottom - oy,
        );
        if content.is_degenerate() {
            return Err(Rejection::Degenerate);
        }
        if content.right <= 0.0
            || content.bottom <= 0.0
            || content.left >= params.final_width as f32
            || content.top >= params.final_height as f32
        {
            return Err(Rejection::OutsideContent);
        }
    }

    let (left, top) = to_original_coords(params, input_box.left, input_box.top);
    let (right, bottom) = to_original_coords(params, input_box.right, input_box.bottom);
    let clamped = BoundingBox::new(left, top, right, bottom).clamp(
        params.original_width as f32,
        params.original_height as f32,
    );
    if clamped.is_degenerate() {
        return Err(Rejection::DegenerateAfterClamp);
    }
    Ok(clamped)
}

//! Rayon-parallel decoding (feature-gated).
//!
//! Rows are independent, so candidates are decoded in parallel and then
//! collected in tensor order. The output is identical to [`decode`].
//!
//! [`decode`]: super::decode

use super::{decode_candidate, scan_width, DecodeConfig};
use crate::candidate::detection::Detection;
use crate::geometry::letterbox::LetterboxParams;
use crate::labels::LabelTable;
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::DetPostResult;
use rayon::prelude::*;

/// Row-parallel variant of [`decode`](super::decode).
///
/// Observers are not supported here; use
/// [`decode_with_observer`](super::decode_with_observer) for diagnostics.
pub fn decode_par(
    tensor: TensorView<'_>,
    params: &LetterboxParams,
    labels: &LabelTable,
    config: &DecodeConfig,
) -> DetPostResult<Vec<Detection>> {
    let num_scan = scan_width(tensor, labels)?;
    let _span = trace_span!(
        "decode",
        candidates = tensor.num_candidates(),
        classes = num_scan,
        parallel = true
    )
    .entered();

    let out: Vec<Detection> = (0..tensor.num_candidates())
        .into_par_iter()
        .filter_map(|index| {
            let candidate = tensor.candidate(index)?;
            decode_candidate(candidate, params, labels, config, num_scan)
                .result
                .ok()
        })
        .collect();

    trace_event!("decoded_candidates", count = out.len());
    Ok(out)
}

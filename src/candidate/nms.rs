//! Class-aware greedy non-maximum suppression.

use crate::candidate::detection::Detection;
use crate::geometry::iou;
use crate::trace::{trace_event, trace_span};
use std::cmp::Ordering;

fn confidence_cmp_desc(a: &Detection, b: &Detection) -> Ordering {
    b.confidence().total_cmp(&a.confidence())
}

/// Removes overlapping detections of the same class.
///
/// Detections are stably sorted by descending confidence. Walking that order,
/// each surviving detection is accepted and suppresses every later detection
/// of the same `class_id` whose IoU with it exceeds `iou_threshold`. Boxes of
/// different classes never suppress each other. The walk stops as soon as
/// `max_detections` have been accepted; the remainder is dropped.
///
/// The output is in acceptance order (descending confidence).
///
/// Complexity is O(n²) in the number of input detections. That is fine for
/// the few hundred candidates left after confidence filtering, but a much
/// larger candidate count would call for a spatial index.
pub fn suppress(
    mut detections: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    let _span = trace_span!("suppress", candidates = detections.len()).entered();

    // `sort_by` is stable: equal confidences keep their input order.
    detections.sort_by(confidence_cmp_desc);

    let mut suppressed = vec![false; detections.len()];
    let mut keep = vec![false; detections.len()];
    let mut accepted = 0usize;

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        if accepted >= max_detections {
            break;
        }
        keep[i] = true;
        accepted += 1;

        let current = &detections[i];
        for j in (i + 1)..detections.len() {
            if suppressed[j] {
                continue;
            }
            let other = &detections[j];
            if other.class_id() != current.class_id() {
                continue;
            }
            if iou(current.bounding_box(), other.bounding_box()) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    let out: Vec<Detection> = detections
        .into_iter()
        .zip(keep)
        .filter_map(|(det, kept)| kept.then_some(det))
        .collect();

    trace_event!("suppress_kept", count = out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::suppress;
    use crate::candidate::detection::Detection;
    use crate::geometry::BoundingBox;

    fn det(left: f32, top: f32, size: f32, confidence: f32, class_id: i32) -> Detection {
        let bbox = BoundingBox::new(left, top, left + size, top + size);
        Detection::new(bbox, format!("c{class_id}"), confidence, class_id)
    }

    #[test]
    fn equal_confidences_keep_input_order() {
        let out = suppress(
            vec![
                det(0.0, 0.0, 10.0, 0.5, 0),
                det(100.0, 0.0, 10.0, 0.5, 1),
                det(200.0, 0.0, 10.0, 0.7, 2),
            ],
            0.5,
            10,
        );
        let ids: Vec<i32> = out.iter().map(Detection::class_id).collect();
        assert_eq!(ids, vec![2, 0, 1]);
    }

    #[test]
    fn cap_stops_the_walk() {
        let input = (0..5)
            .map(|i| det(i as f32 * 50.0, 0.0, 10.0, 0.9 - i as f32 * 0.1, 0))
            .collect();
        let out = suppress(input, 0.5, 2);
        assert_eq!(out.len(), 2);
        assert!((out[0].confidence() - 0.9).abs() < 1e-6);
        assert!((out[1].confidence() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_cap_yields_nothing() {
        let out = suppress(vec![det(0.0, 0.0, 10.0, 0.9, 0)], 0.5, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn suppressed_boxes_do_not_suppress_others() {
        // b overlaps a heavily and c overlaps b heavily, but c barely
        // overlaps a. Once b is suppressed by a, c must survive.
        let a = det(0.0, 0.0, 10.0, 0.9, 0);
        let b = det(3.0, 0.0, 10.0, 0.8, 0);
        let c = det(6.0, 0.0, 10.0, 0.7, 0);
        let out = suppress(vec![a, b, c], 0.45, 10);
        let confs: Vec<f32> = out.iter().map(Detection::confidence).collect();
        assert_eq!(confs, vec![0.9, 0.7]);
    }
}

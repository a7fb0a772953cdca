//! Final detection value handed to the caller.

use crate::geometry::BoundingBox;
use std::fmt;

/// A labeled box in original-image pixel coordinates.
///
/// Constructed by the decoder with a non-degenerate, clamped box; read-only
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    bounding_box: BoundingBox,
    label: String,
    confidence: f32,
    class_id: i32,
}

impl Detection {
    /// Creates a detection.
    pub fn new(
        bounding_box: BoundingBox,
        label: impl Into<String>,
        confidence: f32,
        class_id: i32,
    ) -> Self {
        Self {
            bounding_box,
            label: label.into(),
            confidence,
            class_id,
        }
    }

    /// Returns the box in original-image pixels.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Returns the class name, or `"Unknown"` for unresolved ids.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the best class score.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Returns the class id, `-1` when no class scored above zero.
    pub fn class_id(&self) -> i32 {
        self.class_id
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.label, self.confidence * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Detection;
    use crate::geometry::BoundingBox;

    #[test]
    fn display_shows_label_and_percentage() {
        let det = Detection::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), "dog", 0.875, 16);
        assert_eq!(det.to_string(), "dog (87.50%)");
    }
}

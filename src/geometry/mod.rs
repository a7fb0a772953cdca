//! Axis-aligned boxes and the letterbox coordinate mapping.
//!
//! Boxes are stored as corners `(left, top, right, bottom)` in pixel units,
//! with `right`/`bottom` exclusive in the continuous sense: a box from 0 to
//! 10 has width 10.

pub mod letterbox;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge (minimum x).
    pub left: f32,
    /// Top edge (minimum y).
    pub top: f32,
    /// Right edge (maximum x).
    pub right: f32,
    /// Bottom edge (maximum y).
    pub bottom: f32,
}

impl BoundingBox {
    /// Creates a box from its four corners.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a box from a center point and a size.
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::new(
            center_x - half_w,
            center_y - half_h,
            center_x + half_w,
            center_y + half_h,
        )
    }

    /// Returns the box width (may be negative for malformed boxes).
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Returns the box height (may be negative for malformed boxes).
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Returns the area, or 0 when the box is degenerate.
    pub fn area(&self) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.width() * self.height()
    }

    /// Returns true when the box has no positive extent on either axis.
    ///
    /// NaN corners compare false, so such boxes are degenerate too.
    pub fn is_degenerate(&self) -> bool {
        !(self.right > self.left && self.bottom > self.top)
    }

    /// Clamps all corners into `[0, max_x] x [0, max_y]`.
    pub fn clamp(&self, max_x: f32, max_y: f32) -> Self {
        Self::new(
            self.left.clamp(0.0, max_x),
            self.top.clamp(0.0, max_y),
            self.right.clamp(0.0, max_x),
            self.bottom.clamp(0.0, max_y),
        )
    }

    /// Returns the overlapping region, or `None` when the boxes do not overlap.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let overlap = Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        if overlap.is_degenerate() {
            None
        } else {
            Some(overlap)
        }
    }
}

/// Intersection-over-union of two boxes.
///
/// Returns 0 when the boxes do not overlap; the union is strictly positive
/// whenever an intersection exists, so no division by zero can occur.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let Some(overlap) = a.intersection(b) else {
        return 0.0;
    };
    let inter = overlap.area();
    let union = a.area() + b.area() - inter;
    inter / union
}

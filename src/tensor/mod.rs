//! Borrowed views over raw detector output.
//!
//! A detector emits `num_candidates` proposals, each with `num_attributes`
//! floats: four box parameters `(cx, cy, w, h)` followed by one score per
//! class. `TensorView` borrows the flat buffer and knows how the two axes are
//! laid out, so the decoder never copies or transposes the output.

use crate::util::{DetPostError, DetPostResult};

/// Number of box parameters preceding the class scores.
pub const BOX_ATTRIBUTES: usize = 4;

/// Memory order of the detector output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[num_candidates][num_attributes]`: one contiguous row per candidate.
    #[default]
    CandidateMajor,
    /// `[num_attributes][num_candidates]`: one contiguous plane per attribute.
    AttributeMajor,
}

/// Borrowed 2D view of a detector output tensor.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    num_candidates: usize,
    num_attributes: usize,
    layout: TensorLayout,
}

impl<'a> TensorView<'a> {
    /// Creates a candidate-major view (`[N][4 + C]`).
    pub fn from_rows(
        data: &'a [f32],
        num_candidates: usize,
        num_attributes: usize,
    ) -> DetPostResult<Self> {
        Self::new(
            data,
            num_candidates,
            num_attributes,
            TensorLayout::CandidateMajor,
        )
    }

    /// Creates a view with an explicit layout.
    pub fn new(
        data: &'a [f32],
        num_candidates: usize,
        num_attributes: usize,
        layout: TensorLayout,
    ) -> DetPostResult<Self> {
        let needed = required_len(num_candidates, num_attributes)?;
        if data.len() < needed {
            return Err(DetPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            num_candidates,
            num_attributes,
            layout,
        })
    }

    /// Returns the number of candidates (proposals).
    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    /// Returns the number of attributes per candidate (`4 + C`).
    pub fn num_attributes(&self) -> usize {
        self.num_attributes
    }

    /// Returns the number of class-score columns.
    pub fn num_classes(&self) -> usize {
        self.num_attributes.saturating_sub(BOX_ATTRIBUTES)
    }

    /// Returns the memory layout.
    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns attribute `attr` of candidate `candidate` if both are in range.
    pub fn get(&self, candidate: usize, attr: usize) -> Option<f32> {
        if candidate >= self.num_candidates || attr >= self.num_attributes {
            return None;
        }
        Some(self.data[self.index(candidate, attr)])
    }

    /// Returns the contiguous row for `candidate` in candidate-major layout.
    ///
    /// Attribute-major tensors have no contiguous rows and return `None`.
    pub fn row(&self, candidate: usize) -> Option<&'a [f32]> {
        if self.layout != TensorLayout::CandidateMajor || candidate >= self.num_candidates {
            return None;
        }
        let start = candidate * self.num_attributes;
        self.data.get(start..start + self.num_attributes)
    }

    /// Returns a lightweight accessor for one candidate.
    pub fn candidate(&self, candidate: usize) -> Option<CandidateRef<'a>> {
        if candidate >= self.num_candidates {
            return None;
        }
        Some(CandidateRef {
            view: *self,
            index: candidate,
        })
    }

    #[inline]
    fn index(&self, candidate: usize, attr: usize) -> usize {
        match self.layout {
            TensorLayout::CandidateMajor => candidate * self.num_attributes + attr,
            TensorLayout::AttributeMajor => attr * self.num_candidates + candidate,
        }
    }
}

/// One candidate of a [`TensorView`], independent of layout.
#[derive(Copy, Clone, Debug)]
pub struct CandidateRef<'a> {
    view: TensorView<'a>,
    index: usize,
}

impl CandidateRef<'_> {
    /// Returns the candidate index (row in tensor order).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `(center_x, center_y, width, height)`.
    #[inline]
    pub fn box_params(&self) -> (f32, f32, f32, f32) {
        let v = &self.view;
        (
            v.data[v.index(self.index, 0)],
            v.data[v.index(self.index, 1)],
            v.data[v.index(self.index, 2)],
            v.data[v.index(self.index, 3)],
        )
    }

    /// Returns the score for `class_id`, or `None` past the last class column.
    #[inline]
    pub fn class_score(&self, class_id: usize) -> Option<f32> {
        self.view.get(self.index, BOX_ATTRIBUTES + class_id)
    }
}

/// Owned tensor buffer with a fixed shape and layout.
#[derive(Clone, Debug)]
pub struct OwnedTensor {
    data: Vec<f32>,
    num_candidates: usize,
    num_attributes: usize,
    layout: TensorLayout,
}

impl OwnedTensor {
    /// Wraps a buffer after validating its shape.
    pub fn new(
        data: Vec<f32>,
        num_candidates: usize,
        num_attributes: usize,
        layout: TensorLayout,
    ) -> DetPostResult<Self> {
        TensorView::new(&data, num_candidates, num_attributes, layout)?;
        Ok(Self {
            data,
            num_candidates,
            num_attributes,
            layout,
        })
    }

    /// Builds a candidate-major tensor from equally sized rows.
    pub fn from_row_vecs(rows: &[Vec<f32>]) -> DetPostResult<Self> {
        let num_attributes = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != num_attributes) {
            return Err(DetPostError::ShapeMismatch {
                reason: "tensor rows have differing lengths",
            });
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(
            data,
            rows.len(),
            num_attributes,
            TensorLayout::CandidateMajor,
        )
    }

    /// Returns a borrowed view of the tensor.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            data: &self.data,
            num_candidates: self.num_candidates,
            num_attributes: self.num_attributes,
            layout: self.layout,
        }
    }

    /// Consumes the tensor and returns the flat buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

fn required_len(num_candidates: usize, num_attributes: usize) -> DetPostResult<usize> {
    if num_attributes == 0 {
        return Err(DetPostError::InvalidDimensions {
            candidates: num_candidates,
            attributes: num_attributes,
        });
    }
    num_candidates
        .checked_mul(num_attributes)
        .ok_or(DetPostError::InvalidDimensions {
            candidates: num_candidates,
            attributes: num_attributes,
        })
}

#[cfg(test)]
mod tests {
    use super::{OwnedTensor, TensorLayout, TensorView};

    #[test]
    fn layouts_address_the_same_logical_element() {
        // Two candidates, five attributes; values encode (candidate, attr).
        let rows: Vec<f32> = (0..2)
            .flat_map(|c| (0..5).map(move |a| (c * 10 + a) as f32))
            .collect();
        let mut planes = vec![0.0f32; 10];
        for c in 0..2 {
            for a in 0..5 {
                planes[a * 2 + c] = rows[c * 5 + a];
            }
        }
        let by_row = TensorView::from_rows(&rows, 2, 5).unwrap();
        let by_attr = TensorView::new(&planes, 2, 5, TensorLayout::AttributeMajor).unwrap();
        for c in 0..2 {
            for a in 0..5 {
                assert_eq!(by_row.get(c, a), by_attr.get(c, a));
            }
        }
        assert_eq!(by_row.row(1).unwrap(), &[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert!(by_attr.row(1).is_none());
        let cand = by_attr.candidate(1).unwrap();
        assert_eq!(cand.box_params(), (10.0, 11.0, 12.0, 13.0));
        assert_eq!(cand.class_score(0), Some(14.0));
        assert_eq!(cand.class_score(1), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![0.0; 5], vec![0.0; 6]];
        assert!(OwnedTensor::from_row_vecs(&rows).is_err());
    }
}

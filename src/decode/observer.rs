//! Per-candidate diagnostics hook for decoding.
//!
//! Hosts that want to see why candidates were dropped pass an observer to
//! [`decode_with_observer`](super::decode_with_observer). Closures taking a
//! `&CandidateEvent` implement the trait directly.

use crate::candidate::detection::Detection;

/// Reason a candidate row produced no detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Best class score is below the confidence threshold.
    LowConfidence,
    /// Box has no positive extent in input space.
    Degenerate,
    /// Box lies entirely in the letterbox padding.
    OutsideContent,
    /// Box collapsed after clamping to the original image.
    DegenerateAfterClamp,
}

/// Result of decoding one candidate.
#[derive(Clone, Copy, Debug)]
pub enum CandidateOutcome<'a> {
    /// The candidate became this detection.
    Accepted(&'a Detection),
    /// The candidate was filtered.
    Rejected(Rejection),
}

/// Event reported once per tensor row.
#[derive(Clone, Copy, Debug)]
pub struct CandidateEvent<'a> {
    /// Row index in tensor order.
    pub index: usize,
    /// Best class score found in the row.
    pub confidence: f32,
    /// Best class id, `-1` if no score exceeded zero.
    pub class_id: i32,
    /// What happened to the row.
    pub outcome: CandidateOutcome<'a>,
}

/// Receives one event per decoded candidate row.
pub trait DecodeObserver {
    /// Called in tensor row order.
    fn on_candidate(&mut self, event: &CandidateEvent<'_>);
}

impl<F> DecodeObserver for F
where
    F: FnMut(&CandidateEvent<'_>),
{
    fn on_candidate(&mut self, event: &CandidateEvent<'_>) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl DecodeObserver for NoopObserver {
    #[inline]
    fn on_candidate(&mut self, _event: &CandidateEvent<'_>) {}
}

/// Observer that tallies accepted rows and each rejection reason.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Rows that produced a detection.
    pub accepted: usize,
    /// Rows below the confidence threshold.
    pub low_confidence: usize,
    /// Rows with an empty box in input space.
    pub degenerate: usize,
    /// Rows entirely inside the padding.
    pub outside_content: usize,
    /// Rows whose box vanished after clamping.
    pub degenerate_after_clamp: usize,
}

impl DecodeStats {
    /// Total rows observed.
    pub fn total(&self) -> usize {
        self.accepted
            + self.low_confidence
            + self.degenerate
            + self.outside_content
            + self.degenerate_after_clamp
    }
}

impl DecodeObserver for DecodeStats {
    fn on_candidate(&mut self, event: &CandidateEvent<'_>) {
        match event.outcome {
            CandidateOutcome::Accepted(_) => self.accepted += 1,
            CandidateOutcome::Rejected(Rejection::LowConfidence) => self.low_confidence += 1,
            CandidateOutcome::Rejected(Rejection::Degenerate) => self.degenerate += 1,
            CandidateOutcome::Rejected(Rejection::OutsideContent) => self.outside_content += 1,
            CandidateOutcome::Rejected(Rejection::DegenerateAfterClamp) => {
                self.degenerate_after_clamp += 1
            }
        }
    }
}

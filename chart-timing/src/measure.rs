//! Measure arithmetic: derivation of a measure cursor from a
//! signature segment, and advancement within the segment.

use crate::segment::SigInfo;
use crate::signature::TimeSignature;
use crate::{MeasureIdx, Tick};

/// Information about one measure: a small `Copy` cursor record.
///
/// Queries return it positioned on the requested measure; iterators
/// step it forward one measure at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureInfo {
    /// Measure index, 0-based at the chart's first signature segment.
    pub idx: MeasureIdx,
    /// Start tick of this measure.
    pub tick: Tick,
    /// Governing time signature.
    pub sig: TimeSignature,
    /// Length of one beat in ticks.
    pub beat_length: Tick,
    /// Length of this measure in ticks.
    pub full_length: Tick,
}

impl MeasureInfo {
    /// Move the cursor to the measure containing `tick`.
    ///
    /// The signed offset is floor-divided (`div_euclid`, toward
    /// negative infinity), so ticks before the segment's start
    /// resolve to negative measure offsets instead of rounding back
    /// toward the segment. The target measure is assumed to lie in
    /// the same signature segment.
    pub fn advance_to_tick(&mut self, tick: Tick) {
        let diff = (tick - self.tick).div_euclid(self.full_length);
        self.idx += diff;
        self.tick += diff * self.full_length;
    }

    /// Move the cursor to the measure `idx` of the same segment. The
    /// offset is a whole number of measures, so no rounding is
    /// involved.
    pub fn advance_to_idx(&mut self, idx: MeasureIdx) {
        self.tick += (idx - self.idx) * self.full_length;
        self.idx = idx;
    }

    /// Step forward by exactly one measure.
    pub(crate) fn step(&mut self) {
        self.idx += 1;
        self.tick += self.full_length;
    }
}

impl From<&SigInfo> for MeasureInfo {
    /// Cursor at the first measure of the segment.
    fn from(seg: &SigInfo) -> Self {
        Self {
            idx: seg.measure_idx,
            tick: seg.tick,
            sig: seg.sig,
            beat_length: seg.beat_length,
            full_length: seg.full_length,
        }
    }
}

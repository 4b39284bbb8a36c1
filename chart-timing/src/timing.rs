//! The timing facade: tick ⇄ time ⇄ measure queries over the built
//! timelines.

use std::fmt;
use std::ops::Range;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::error::TimingError;
use crate::measure::MeasureInfo;
use crate::segment::{
    build_bpm_infos, build_sig_infos, time_at_tick, BpmInfo, SigInfo,
    DEFAULT_BPM,
};
use crate::signature::TimeSignature;
use crate::timeline::Timeline;
use crate::{MeasureIdx, Tick};

/// Complete timing context at one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingInfo {
    pub tick: Tick,
    /// Wall-clock time at `tick`, in milliseconds.
    pub time: f64,
    /// BPM in effect at `tick`.
    pub bpm: f64,
    /// The measure containing `tick`.
    pub measure: MeasureInfo,
}

/// Serializable boundary form of a [`Timing`]: the segment change
/// points only, none of the derived fields. Suitable for persisting
/// back into a chart file's timing block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingData {
    /// Ticks per quarter note.
    pub res: Tick,
    /// Sorted BPM changes.
    pub bpm: Vec<(Tick, f64)>,
    /// Sorted time signature changes.
    pub sig: Vec<(Tick, TimeSignature)>,
}

impl Default for TimingData {
    fn default() -> Self {
        Self {
            res: 24,
            bpm: vec![(0, DEFAULT_BPM)],
            sig: vec![(0, TimeSignature::default())],
        }
    }
}

/// Timing information of a chart.
///
/// Built once from sorted change lists, immutable afterwards —
/// retiming a chart means building a new instance. Offsets are not
/// taken into account.
#[derive(Debug, Clone)]
pub struct Timing {
    res: Tick,
    bpm: Timeline<BpmInfo>,
    sig: Timeline<SigInfo>,
}

impl Timing {
    /// Builds both timelines from sorted change lists.
    ///
    /// The lists must be sorted by tick (the schema layer guarantees
    /// this; they are not re-sorted here). Fails eagerly on a
    /// non-positive resolution, a non-finite or non-positive BPM, a
    /// non-positive signature component, or a signature whose measure
    /// length is not a whole number of ticks at this resolution.
    pub fn new(
        res: Tick,
        bpm_changes: &[(Tick, f64)],
        sig_changes: &[(Tick, TimeSignature)],
    ) -> Result<Self, TimingError> {
        if res <= 0 {
            return Err(TimingError::InvalidResolution(res));
        }

        let bpm = Timeline::new(build_bpm_infos(res, bpm_changes)?);
        let sig =
            Timeline::new(build_sig_infos(res, &bpm, sig_changes)?);

        log::debug!(
            "built timing: res={res}, {} tempo and {} signature \
             segments",
            bpm.len(),
            sig.len()
        );

        Ok(Self { res, bpm, sig })
    }

    pub fn from_data(data: &TimingData) -> Result<Self, TimingError> {
        Self::new(data.res, &data.bpm, &data.sig)
    }

    /// The segment boundaries, in the form they round-trip through a
    /// chart file (synthesized tick-0 segments included).
    pub fn to_data(&self) -> TimingData {
        TimingData {
            res: self.res,
            bpm: self
                .bpm
                .iter()
                .map(|info| (info.tick, info.bpm))
                .collect(),
            sig: self
                .sig
                .iter()
                .map(|info| (info.tick, info.sig))
                .collect(),
        }
    }

    /// Ticks per quarter note.
    pub fn res(&self) -> Tick {
        self.res
    }

    /// Time (in milliseconds) at `tick`.
    ///
    /// Ticks outside the mapped range extrapolate linearly from the
    /// first/last tempo segment.
    pub fn get_time_by_tick(&self, tick: Tick) -> f64 {
        time_at_tick(self.res, &self.bpm, tick)
    }

    /// Inverse of [`Timing::get_time_by_tick`]: the (fractional) tick
    /// at `time` milliseconds, via the time-keyed tempo lookup.
    pub fn get_tick_by_time(&self, time: f64) -> f64 {
        let (_, info) =
            self.bpm.floor_or_first_by(time, |i| i.time);
        info.tick_at(self.res, time)
    }

    /// Information about the measure containing `tick`.
    pub fn get_measure_info_by_tick(&self, tick: Tick) -> MeasureInfo {
        let (_, seg) = self.sig.floor_or_first_by(tick, |s| s.tick);
        let mut info = MeasureInfo::from(seg);
        info.advance_to_tick(tick);
        info
    }

    /// Information about the measure with index `idx`, via the
    /// measure-keyed signature lookup.
    pub fn get_measure_info_by_idx(
        &self,
        idx: MeasureIdx,
    ) -> MeasureInfo {
        let (_, seg) =
            self.sig.floor_or_first_by(idx, |s| s.measure_idx);
        let mut info = MeasureInfo::from(seg);
        info.advance_to_idx(idx);
        info
    }

    /// Iterates over all measures in the half-open tick range, in
    /// increasing index order. A partially included measure also
    /// counts. Past the last signature segment, measures continue
    /// with that segment's length indefinitely.
    ///
    /// Each call produces a fresh, independent iterator.
    ///
    /// # Example
    ///
    /// ```
    /// use chart_timing::Timing;
    ///
    /// let timing = Timing::default();
    /// let ticks: Vec<_> =
    ///     timing.measures(0..200).map(|m| m.tick).collect();
    /// assert_eq!(ticks, vec![0, 96, 192]);
    /// ```
    pub fn measures(&self, range: Range<Tick>) -> Measures<'_> {
        let (pos, seg) =
            self.sig.floor_or_first_by(range.start, |s| s.tick);
        let mut cursor = MeasureInfo::from(seg);
        cursor.advance_to_tick(range.start);

        let mut rest = self.sig.iter_from(pos + 1);
        Measures {
            next_seg: rest.next(),
            rest,
            cursor,
            end: range.end,
        }
    }

    /// Annotates an ascending `(tick, payload)` sequence with full
    /// timing context, lazily and in a single pass: the tempo and
    /// signature cursors only ever move forward, so repeated lookups
    /// are amortized across the whole sequence.
    ///
    /// Ticks must be non-decreasing. This precondition is the
    /// caller's responsibility and is only checked by a
    /// `debug_assert!`; out-of-order input yields unspecified (but
    /// memory-safe) annotations.
    ///
    /// # Example
    ///
    /// ```
    /// use chart_timing::Timing;
    ///
    /// let timing = Timing::default();
    /// let notes = vec![(0, "kick"), (48, "snare"), (96, "kick")];
    /// for (info, name) in timing.with_timing_info(notes) {
    ///     println!("{name} at {} ms", info.time);
    /// }
    /// ```
    pub fn with_timing_info<T, I>(
        &self,
        it: I,
    ) -> WithTimingInfo<'_, I::IntoIter>
    where
        I: IntoIterator<Item = (Tick, T)>,
    {
        WithTimingInfo {
            timing: self,
            input: it.into_iter(),
            state: None,
        }
    }
}

impl Default for Timing {
    /// Chart-file defaults: res 24, 120 BPM, 4/4.
    fn default() -> Self {
        Self::from_data(&TimingData::default())
            .expect("default timing data is valid")
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Timing with {} bpm and {} time_sig]",
            self.bpm.len(),
            self.sig.len()
        )
    }
}

/// Lazy iterator over the measures intersecting a tick range.
/// Returned by [`Timing::measures`].
#[derive(Debug, Clone)]
pub struct Measures<'a> {
    rest: slice::Iter<'a, SigInfo>,
    next_seg: Option<&'a SigInfo>,
    cursor: MeasureInfo,
    end: Tick,
}

impl Iterator for Measures<'_> {
    type Item = MeasureInfo;

    fn next(&mut self) -> Option<MeasureInfo> {
        // Switch segments once the cursor has emitted every measure
        // belonging to the current one. Segment boundaries need not
        // be measure-aligned: a partial measure was already counted
        // by the builder's ceiling rounding, so the next segment's
        // first measure may start before `cursor.tick + full_length`.
        while let Some(seg) = self.next_seg {
            if self.cursor.idx < seg.measure_idx {
                break;
            }
            self.cursor = MeasureInfo::from(seg);
            self.next_seg = self.rest.next();
        }

        if self.cursor.tick >= self.end {
            return None;
        }
        let out = self.cursor;
        self.cursor.step();
        Some(out)
    }
}

/// Lazy annotating iterator returned by [`Timing::with_timing_info`].
pub struct WithTimingInfo<'a, I> {
    timing: &'a Timing,
    input: I,
    state: Option<StreamState<'a>>,
}

/// Forward cursors over both timelines, initialized lazily at the
/// first input element.
struct StreamState<'a> {
    bpm_rest: slice::Iter<'a, BpmInfo>,
    sig_rest: slice::Iter<'a, SigInfo>,
    bpm: &'a BpmInfo,
    next_bpm: Option<&'a BpmInfo>,
    next_sig: Option<&'a SigInfo>,
    measure: MeasureInfo,
    last_tick: Tick,
}

impl<'a> StreamState<'a> {
    fn new(timing: &'a Timing, tick: Tick) -> Self {
        let (bpm_pos, bpm) =
            timing.bpm.floor_or_first_by(tick, |i| i.tick);
        let (sig_pos, seg) =
            timing.sig.floor_or_first_by(tick, |s| s.tick);

        let mut bpm_rest = timing.bpm.iter_from(bpm_pos + 1);
        let mut sig_rest = timing.sig.iter_from(sig_pos + 1);
        let next_bpm = bpm_rest.next();
        let next_sig = sig_rest.next();

        Self {
            bpm_rest,
            sig_rest,
            bpm,
            next_bpm,
            next_sig,
            measure: MeasureInfo::from(seg),
            last_tick: tick,
        }
    }

    /// Advances both segment cursors up to `tick`.
    fn seek(&mut self, tick: Tick) {
        while let Some(info) = self.next_bpm {
            if info.tick > tick {
                break;
            }
            self.bpm = info;
            self.next_bpm = self.bpm_rest.next();
        }
        while let Some(seg) = self.next_sig {
            if seg.tick > tick {
                break;
            }
            self.measure = MeasureInfo::from(seg);
            self.next_sig = self.sig_rest.next();
        }
        self.measure.advance_to_tick(tick);
    }
}

impl<'a, T, I> Iterator for WithTimingInfo<'a, I>
where
    I: Iterator<Item = (Tick, T)>,
{
    type Item = (TimingInfo, T);

    fn next(&mut self) -> Option<Self::Item> {
        let (tick, payload) = self.input.next()?;

        let timing = self.timing;
        let state = self
            .state
            .get_or_insert_with(|| StreamState::new(timing, tick));
        debug_assert!(
            tick >= state.last_tick,
            "input ticks must be non-decreasing (tick={tick})"
        );

        state.last_tick = tick;
        state.seek(tick);

        let info = TimingInfo {
            tick,
            time: state.bpm.time_at(self.timing.res, tick),
            bpm: state.bpm.bpm,
            measure: state.measure,
        };
        Some((info, payload))
    }
}

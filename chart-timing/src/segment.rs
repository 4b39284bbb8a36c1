//! Segment records and the builders that turn sorted change lists
//! into complete, time-stamped timelines.
//!
//! Change lists arrive from the schema layer already sorted by tick;
//! the builders accumulate wall-clock time with exact-before-divide
//! arithmetic, stamp measure indices, and synthesize a tick-0 record
//! when the caller supplies no segment at or before tick 0, so that
//! every query has a segment to extrapolate from.

use crate::error::TimingError;
use crate::signature::TimeSignature;
use crate::timeline::Timeline;
use crate::{MeasureIdx, Tick};

/// BPM assumed when a chart defines no tempo at all.
pub const DEFAULT_BPM: f64 = 120.0;

/// One segment of the tempo timeline: `bpm` holds from `tick` until
/// the next segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmInfo {
    pub tick: Tick,
    /// Wall-clock time at `tick`, in milliseconds, accumulated over
    /// all earlier segments.
    pub time: f64,
    pub bpm: f64,
}

impl BpmInfo {
    /// Time in milliseconds at `tick`, extrapolated linearly from
    /// this segment. Also valid for ticks before `self.tick` — point
    /// queries use the first segment this way, without clamping.
    pub fn time_at(&self, res: Tick, tick: Tick) -> f64 {
        // Multiply in integers before dividing, so rounding error
        // does not accumulate across many short segments.
        let diff = 60_000i128 * (tick - self.tick) as i128;
        self.time + diff as f64 / (res as f64 * self.bpm)
    }

    /// Inverse of [`BpmInfo::time_at`]: the (fractional) tick at
    /// `time` under this segment's tempo.
    pub fn tick_at(&self, res: Tick, time: f64) -> f64 {
        self.tick as f64
            + (time - self.time) * (res as f64 * self.bpm) / 60_000.0
    }
}

/// One segment of the time-signature timeline: `sig` holds from
/// `tick` until the next segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigInfo {
    pub tick: Tick,
    /// Wall-clock time at `tick`, in milliseconds.
    pub time: f64,
    pub sig: TimeSignature,
    /// Index of the measure that begins at `tick`, or contains it
    /// when `tick` is not measure-aligned.
    pub measure_idx: MeasureIdx,
    /// Length of one beat in ticks (`4 * res / denominator`).
    pub beat_length: Tick,
    /// Length of one full measure in ticks
    /// (`beat_length * numerator`).
    pub full_length: Tick,
}

/// Builds the tempo timeline from a sorted `(tick, bpm)` list.
pub(crate) fn build_bpm_infos(
    res: Tick,
    changes: &[(Tick, f64)],
) -> Result<Vec<BpmInfo>, TimingError> {
    let mut infos = Vec::with_capacity(changes.len() + 1);

    // Running state: tick 0 is time 0 by definition, and the first
    // BPM value is assumed to hold before its own change point.
    let first_bpm = changes
        .first()
        .map(|&(_, bpm)| bpm)
        .unwrap_or(DEFAULT_BPM);
    let mut state = BpmInfo {
        tick: 0,
        time: 0.0,
        bpm: first_bpm,
    };

    if changes.first().map_or(true, |&(tick, _)| tick > 0) {
        infos.push(state);
    }

    let mut prev_tick: Option<Tick> = None;
    for &(tick, bpm) in changes {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(TimingError::InvalidBpm { tick, bpm });
        }
        debug_assert!(
            prev_tick.map_or(true, |prev| tick > prev),
            "BPM changes must be strictly ascending (tick={tick})"
        );
        prev_tick = Some(tick);

        state = BpmInfo {
            tick,
            time: state.time_at(res, tick),
            bpm,
        };
        infos.push(state);
    }

    Ok(infos)
}

/// Builds the signature timeline from a sorted `(tick, signature)`
/// list, consulting the tempo timeline for time stamps.
pub(crate) fn build_sig_infos(
    res: Tick,
    bpm: &Timeline<BpmInfo>,
    changes: &[(Tick, TimeSignature)],
) -> Result<Vec<SigInfo>, TimingError> {
    let mut infos = Vec::with_capacity(changes.len() + 1);

    if changes.first().map_or(true, |&(tick, _)| tick > 0) {
        // 4/4 divides any resolution, so the lengths are exact.
        infos.push(SigInfo {
            tick: 0,
            time: time_at_tick(res, bpm, 0),
            sig: TimeSignature::default(),
            measure_idx: 0,
            beat_length: res,
            full_length: 4 * res,
        });
    }

    let mut prev_tick: Option<Tick> = None;
    for &(tick, sig) in changes {
        if sig.numerator == 0 || sig.denominator == 0 {
            return Err(TimingError::InvalidTimeSignature {
                tick,
                sig,
            });
        }
        debug_assert!(
            prev_tick.map_or(true, |prev| tick > prev),
            "signature changes must be strictly ascending \
             (tick={tick})"
        );
        prev_tick = Some(tick);

        let beat_length = sig
            .beat_length(res)
            .ok_or(TimingError::IncompatibleSignature { res, sig })?;
        let full_length = beat_length * sig.numerator as Tick;

        // The measures elapsed since the previous segment are counted
        // with ceiling rounding: a change landing mid-measure still
        // closes that measure (it is a short, partial one). The very
        // first segment anchors measure 0 at its own tick.
        let measure_idx = match infos.last() {
            Some(prev) => {
                let elapsed = tick - prev.tick;
                prev.measure_idx
                    + ceil_div(elapsed, prev.full_length)
            }
            None => 0,
        };

        infos.push(SigInfo {
            tick,
            time: time_at_tick(res, bpm, tick),
            sig,
            measure_idx,
            beat_length,
            full_length,
        });
    }

    Ok(infos)
}

/// Floor lookup + linear extrapolation over the tempo timeline.
pub(crate) fn time_at_tick(
    res: Tick,
    bpm: &Timeline<BpmInfo>,
    tick: Tick,
) -> f64 {
    let (_, info) = bpm.floor_or_first_by(tick, |i| i.tick);
    info.time_at(res, tick)
}

fn ceil_div(num: Tick, den: Tick) -> Tick {
    let quot = num.div_euclid(den);
    match num.rem_euclid(den) {
        0 => quot,
        _ => quot + 1,
    }
}

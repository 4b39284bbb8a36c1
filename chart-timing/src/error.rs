//! Errors reported while building a [`Timing`] instance.
//!
//! Construction is all-or-nothing: any of these aborts the build and
//! no partially built [`Timing`] can be observed. Query methods never
//! return errors — after a successful build the timelines are never
//! empty, and an empty timeline at query time is an internal defect
//! that panics.
//!
//! [`Timing`]: crate::Timing

use thiserror::Error;

use crate::signature::TimeSignature;
use crate::Tick;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimingError {
    /// Resolution must be a positive number of ticks per quarter note.
    #[error("invalid res={0}")]
    InvalidResolution(Tick),

    /// BPM values must be finite and positive.
    #[error("invalid BPM value ({bpm}) at tick={tick}")]
    InvalidBpm { tick: Tick, bpm: f64 },

    /// Numerator and denominator must both be positive.
    #[error("invalid time signature {sig} at tick={tick}")]
    InvalidTimeSignature { tick: Tick, sig: TimeSignature },

    /// A measure of `sig` would not span a whole number of ticks at
    /// this resolution (`4 * res` is not divisible by the
    /// denominator).
    #[error("time signature {sig} is incompatible with res={res}")]
    IncompatibleSignature { res: Tick, sig: TimeSignature },
}

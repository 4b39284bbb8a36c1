//! Time signature of one timing segment.

use std::fmt;

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use crate::Tick;

/// A time signature, e.g. `4/4` or `7/8`.
///
/// Values are validated when a [`Timing`] is built, not here: the
/// upstream schema layer already guarantees positive components for
/// data read from chart files.
///
/// [`Timing`]: crate::Timing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Length of one beat in ticks, if representable.
    ///
    /// A beat is `1/denominator` of a whole note, and a whole note
    /// spans `4 * res` ticks. Returns `None` when the division is not
    /// exact — then `res` and this signature are incompatible.
    pub fn beat_length(&self, res: Tick) -> Option<Tick> {
        let beat =
            Fraction::new(4 * res as u64, self.denominator as u64);
        match (beat.numer(), beat.denom()) {
            (Some(&ticks), Some(&1)) => Some(ticks as Tick),
            _ => None,
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

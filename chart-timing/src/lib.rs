//! Timing core of a music-rhythm chart.
//!
//! A chart stores every position as an integer **tick** count,
//! independent of tempo. This crate maps ticks to wall-clock
//! milliseconds through a piecewise-constant tempo map, and to
//! measure positions (bar index + offset) through a piecewise
//! time-signature map.
//!
//! Both maps are built once, from already-sorted change lists that
//! the upstream schema layer validated, and stay immutable for the
//! lifetime of the [`Timing`] instance. The chart *offset* (a single
//! scalar shift of all time outputs) is not applied here — that is
//! the caller's job.
//!
//! # Example
//!
//! ```
//! use chart_timing::{TimeSignature, Timing};
//!
//! let timing = Timing::new(
//!     24,
//!     &[(0, 240.0)],
//!     &[(0, TimeSignature::new(4, 4))],
//! )
//! .unwrap();
//!
//! assert_eq!(timing.get_time_by_tick(96), 1000.0);
//! let measure = timing.get_measure_info_by_tick(100);
//! assert_eq!(measure.idx, 1);
//! assert_eq!(measure.tick, 96);
//! ```

pub mod error;
pub mod measure;
pub mod segment;
pub mod signature;
mod timeline;
pub mod timing;

pub use error::TimingError;
pub use measure::MeasureInfo;
pub use segment::{BpmInfo, SigInfo};
pub use signature::TimeSignature;
pub use timing::{
    Measures, Timing, TimingData, TimingInfo, WithTimingInfo,
};

/// Unit for note positions in a chart: integer pulse count,
/// independent of tempo. Negative ticks are valid pre-roll positions,
/// tick 0 is the chart's nominal start.
pub type Tick = i64;

/// 0-based index of a measure on the chart timeline.
pub type MeasureIdx = i64;

//! Matchers: predicates over rendered audio
//!
//! A [`Matcher`] is handed the output of a test run, either one block at a
//! time or, for properties of the whole signal, once over the accumulated
//! output. On failure it can report where and why through
//! [`Matcher::failure_details`].

mod equals_to;
mod peaks_at;
mod peaks_below;

pub use equals_to::EqualsTo;
pub use peaks_at::PeaksAt;
pub use peaks_below::PeaksBelow;

use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::error::Result;
use crate::sample::Sample;

/// Where and why the last match failed
#[derive(Debug, Clone, PartialEq)]
pub struct FailureDetails {
    /// Frame within the buffer passed to [`Matcher::matches`]
    pub frame: usize,
    pub channel: usize,
    /// Readable explanation, appended to failure reports
    pub description: String,
}

/// Base trait for all matchers
pub trait Matcher<S: Sample>: Send {
    /// Prepare for a run, called before every run
    fn prepare(
        &mut self,
        sample_rate_hz: f64,
        num_channels: usize,
        max_block_frames: usize,
    ) -> Result<()>;

    /// Check `observed`, recording failure details when it does not match
    fn matches(&mut self, observed: &AudioBuffer<S>) -> Result<bool>;

    /// Check if evaluating every block separately gives the same verdict as
    /// evaluating the whole signal
    fn can_operate_per_block(&self) -> bool;

    /// Rewind internal state, e.g. a reference signal, for a new run
    fn reset(&mut self);

    /// Details of the most recent failed match, if any
    fn failure_details(&self, precision: &Precision) -> Option<FailureDetails>;

    /// Human-readable description of the condition
    fn describe(&self, precision: &Precision) -> String;

    /// Clone the matcher into a boxed trait object
    fn box_clone(&self) -> Box<dyn Matcher<S>>;
}

impl<S: Sample> Clone for Box<dyn Matcher<S>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// A sample that caused a match to fail
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Offender {
    pub frame: usize,
    pub channel: usize,
    pub value: f64,
}

/// First sample in frame order for which `is_offending` returns true
pub(crate) fn find_first<S: Sample>(
    buffer: &AudioBuffer<S>,
    is_offending: impl Fn(usize, usize, f64) -> bool,
) -> Option<Offender> {
    for frame in 0..buffer.num_frames() {
        for channel in 0..buffer.num_channels() {
            let value = buffer[channel][frame].as_f64();
            if is_offending(channel, frame, value) {
                return Some(Offender {
                    frame,
                    channel,
                    value,
                });
            }
        }
    }

    None
}

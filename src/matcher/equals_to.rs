//! Sample-by-sample comparison against a reference signal

use super::{find_first, FailureDetails, Matcher, Offender};
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::error::Result;
use crate::sample::Sample;
use crate::signal::Signal;
use crate::units::ratio_to_db;

/// Passes if the observed audio equals a reference signal within a
/// linear tolerance
///
/// The reference is rendered, chain included, in lock-step with the
/// observed blocks, so it must be reset together with the run.
#[derive(Clone)]
pub struct EqualsTo<S: Sample> {
    reference: Box<dyn Signal<S>>,
    tolerance_linear: f64,
    reference_block: AudioBuffer<S>,
    mismatch: Option<(Offender, f64)>,
}

impl<S: Sample> EqualsTo<S> {
    /// Default linear tolerance per sample
    pub const DEFAULT_TOLERANCE: f64 = 1e-5;

    pub fn new(reference: impl Signal<S> + 'static) -> Self {
        Self::from_boxed(Box::new(reference))
    }

    pub fn from_boxed(reference: Box<dyn Signal<S>>) -> Self {
        Self {
            reference,
            tolerance_linear: Self::DEFAULT_TOLERANCE,
            reference_block: AudioBuffer::new(0, 0),
            mismatch: None,
        }
    }

    pub fn with_tolerance(mut self, tolerance_linear: f64) -> Self {
        self.tolerance_linear = tolerance_linear;
        self
    }
}

impl<S: Sample> Matcher<S> for EqualsTo<S> {
    fn prepare(
        &mut self,
        sample_rate_hz: f64,
        num_channels: usize,
        max_block_frames: usize,
    ) -> Result<()> {
        self.reference
            .prepare_with_chain(sample_rate_hz, num_channels, max_block_frames)
    }

    fn matches(&mut self, observed: &AudioBuffer<S>) -> Result<bool> {
        if self.reference_block.num_channels() != observed.num_channels()
            || self.reference_block.num_frames() != observed.num_frames()
        {
            self.reference_block = AudioBuffer::empty_like(observed);
        }

        self.reference
            .render_next_block_with_chain(&mut self.reference_block)?;

        let reference = &self.reference_block;
        let tolerance = self.tolerance_linear;
        self.mismatch = find_first(observed, |channel, frame, value| {
            (value - reference[channel][frame].as_f64()).abs() > tolerance
        })
        .map(|offender| {
            let expected = reference[offender.channel][offender.frame].as_f64();
            (offender, expected)
        });

        Ok(self.mismatch.is_none())
    }

    fn can_operate_per_block(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.reference.reset_with_chain();
        self.mismatch = None;
    }

    fn failure_details(&self, precision: &Precision) -> Option<FailureDetails> {
        self.mismatch.map(|(offender, expected)| FailureDetails {
            frame: offender.frame,
            channel: offender.channel,
            description: format!(
                "Expected sample value: {} ({} dB), difference: {} (tolerance {})",
                precision.lin(expected),
                precision.db(ratio_to_db(expected.abs())),
                precision.lin((offender.value - expected).abs()),
                precision.lin(self.tolerance_linear)
            ),
        })
    }

    fn describe(&self, precision: &Precision) -> String {
        format!("EqualsTo ({})", self.reference.describe_with_chain(precision))
    }

    fn box_clone(&self) -> Box<dyn Matcher<S>> {
        Box::new(self.clone())
    }
}

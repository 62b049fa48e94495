//! Global peak check

use super::{FailureDetails, Matcher, Offender};
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::error::Result;
use crate::sample::Sample;
use crate::units::{db_to_ratio, ratio_to_db};
use std::marker::PhantomData;

/// Passes if the largest sample magnitude of the whole signal is within
/// a linear tolerance of a target level
///
/// The peak of one block says nothing about the peak of the signal, so this
/// matcher always runs over the complete output.
#[derive(Debug, Clone)]
pub struct PeaksAt<S> {
    target_db: f64,
    tolerance_linear: f64,
    peak: Option<Offender>,
    failed: bool,
    _sample: PhantomData<S>,
}

impl<S: Sample> PeaksAt<S> {
    /// Default linear tolerance around the target peak
    pub const DEFAULT_TOLERANCE: f64 = 1e-3;

    pub fn new(target_db: f64) -> Self {
        Self {
            target_db,
            tolerance_linear: Self::DEFAULT_TOLERANCE,
            peak: None,
            failed: false,
            _sample: PhantomData,
        }
    }

    pub fn with_tolerance(mut self, tolerance_linear: f64) -> Self {
        self.tolerance_linear = tolerance_linear;
        self
    }
}

/// Position and magnitude of the largest sample, earliest frame first
fn find_peak<S: Sample>(buffer: &AudioBuffer<S>) -> Option<Offender> {
    let mut peak: Option<Offender> = None;

    for frame in 0..buffer.num_frames() {
        for channel in 0..buffer.num_channels() {
            let value = buffer[channel][frame].as_f64().abs();
            if peak.map_or(true, |p| value > p.value) {
                peak = Some(Offender {
                    frame,
                    channel,
                    value,
                });
            }
        }
    }

    peak
}

impl<S: Sample> Matcher<S> for PeaksAt<S> {
    fn prepare(&mut self, _: f64, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn matches(&mut self, observed: &AudioBuffer<S>) -> Result<bool> {
        self.peak = find_peak(observed);
        let observed_peak = self.peak.map_or(0.0, |p| p.value);

        self.failed = (observed_peak - db_to_ratio(self.target_db)).abs() >= self.tolerance_linear;
        Ok(!self.failed)
    }

    fn can_operate_per_block(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.peak = None;
        self.failed = false;
    }

    fn failure_details(&self, precision: &Precision) -> Option<FailureDetails> {
        if !self.failed {
            return None;
        }

        let peak = self.peak.unwrap_or(Offender {
            frame: 0,
            channel: 0,
            value: 0.0,
        });

        Some(FailureDetails {
            frame: peak.frame,
            channel: peak.channel,
            description: format!(
                "Observed peak {} ({} dB) differs from {} ({} dB) by more than {}",
                precision.lin(peak.value),
                precision.db(ratio_to_db(peak.value)),
                precision.lin(db_to_ratio(self.target_db)),
                precision.db(self.target_db),
                precision.lin(self.tolerance_linear)
            ),
        })
    }

    fn describe(&self, precision: &Precision) -> String {
        format!("PeaksAt ({} dB)", precision.db(self.target_db))
    }

    fn box_clone(&self) -> Box<dyn Matcher<S>> {
        Box::new(self.clone())
    }
}

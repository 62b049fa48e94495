//! Peak ceiling check

use super::{find_first, FailureDetails, Matcher, Offender};
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::error::Result;
use crate::sample::Sample;
use crate::units::db_to_ratio;
use std::marker::PhantomData;

/// Passes if no sample's magnitude exceeds a threshold
///
/// Can run per block: the signal stays below the threshold iff every block does.
#[derive(Debug, Clone)]
pub struct PeaksBelow<S> {
    threshold_db: f64,
    tolerance_linear: f64,
    offender: Option<Offender>,
    _sample: PhantomData<S>,
}

impl<S: Sample> PeaksBelow<S> {
    /// Default linear tolerance added on top of the threshold
    pub const DEFAULT_TOLERANCE: f64 = 1e-3;

    pub fn new(threshold_db: f64) -> Self {
        Self {
            threshold_db,
            tolerance_linear: Self::DEFAULT_TOLERANCE,
            offender: None,
            _sample: PhantomData,
        }
    }

    pub fn with_tolerance(mut self, tolerance_linear: f64) -> Self {
        self.tolerance_linear = tolerance_linear;
        self
    }

    fn limit(&self) -> f64 {
        db_to_ratio(self.threshold_db) + self.tolerance_linear
    }
}

impl<S: Sample> Matcher<S> for PeaksBelow<S> {
    fn prepare(&mut self, _: f64, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn matches(&mut self, observed: &AudioBuffer<S>) -> Result<bool> {
        let limit = self.limit();
        self.offender = find_first(observed, |_, _, value| value.abs() > limit);
        Ok(self.offender.is_none())
    }

    fn can_operate_per_block(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.offender = None;
    }

    fn failure_details(&self, precision: &Precision) -> Option<FailureDetails> {
        self.offender.map(|offender| FailureDetails {
            frame: offender.frame,
            channel: offender.channel,
            description: format!(
                "Sample magnitude exceeds {} ({} dB)",
                precision.lin(self.limit()),
                precision.db(self.threshold_db)
            ),
        })
    }

    fn describe(&self, precision: &Precision) -> String {
        format!("PeaksBelow ({} dB)", precision.db(self.threshold_db))
    }

    fn box_clone(&self) -> Box<dyn Matcher<S>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(samples: Vec<Vec<f32>>) -> AudioBuffer<f32> {
        AudioBuffer::from_channels(samples).unwrap()
    }

    #[test]
    fn test_passes_below_threshold() {
        let mut matcher = PeaksBelow::new(-6.0);
        assert!(matcher.matches(&buffer(vec![vec![0.1, -0.4, 0.5]])).unwrap());
        assert!(matcher.failure_details(&Precision::default()).is_none());
    }

    #[test]
    fn test_tolerance_is_linear_headroom() {
        let exactly = db_to_ratio(-6.0) as f32;
        let mut matcher = PeaksBelow::new(-6.0);
        assert!(matcher.matches(&buffer(vec![vec![exactly + 0.0009]])).unwrap());
        assert!(!matcher.matches(&buffer(vec![vec![exactly + 0.002]])).unwrap());

        let mut strict = PeaksBelow::new(-6.0).with_tolerance(0.0);
        assert!(!strict.matches(&buffer(vec![vec![exactly + 1e-4]])).unwrap());
    }

    #[test]
    fn test_reports_first_offending_frame() {
        let mut matcher = PeaksBelow::new(0.0);
        let observed = buffer(vec![vec![0.0, 0.5, 0.0, 3.0], vec![0.0, 0.0, -2.0, 0.0]]);

        assert!(!matcher.matches(&observed).unwrap());
        let details = matcher.failure_details(&Precision::default()).unwrap();
        assert_eq!((details.frame, details.channel), (2, 1));
        assert_eq!(details.description, "Sample magnitude exceeds 1.00100 (0.00 dB)");
    }

    #[test]
    fn test_per_block() {
        assert!(Matcher::<f32>::can_operate_per_block(&PeaksBelow::new(0.0)));
    }

    #[test]
    fn test_describe() {
        let matcher = PeaksBelow::<f64>::new(-3.0);
        assert_eq!(matcher.describe(&Precision::default()), "PeaksBelow (-3.00 dB)");
    }
}

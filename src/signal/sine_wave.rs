//! Fixed-frequency sine wave

use super::Signal;
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::EffectChain;
use crate::error::{HarnessError, Result};
use crate::sample::Sample;
use crate::units::{wrap_phase, TWO_PI};

/// Unit-amplitude sine at a fixed frequency
///
/// Every channel carries the same samples.
#[derive(Debug, Clone)]
pub struct SineWave<S: Sample> {
    frequency_hz: f64,
    initial_phase_radians: f64,
    phase_radians: f64,
    phase_increment: f64,
    chain: EffectChain<S>,
}

impl<S: Sample> SineWave<S> {
    /// Create a sine starting at phase zero
    ///
    /// Fails with a configuration error unless `frequency_hz` is positive.
    pub fn new(frequency_hz: f64) -> Result<Self> {
        Self::with_phase(frequency_hz, 0.0)
    }

    /// Create a sine starting at `phase_radians` (wrapped into `[0, 2π)`)
    pub fn with_phase(frequency_hz: f64, phase_radians: f64) -> Result<Self> {
        if frequency_hz.is_nan() || frequency_hz <= 0.0 {
            return Err(HarnessError::configuration(format!(
                "Invalid sine frequency: {} Hz",
                frequency_hz
            )));
        }

        let phase_radians = wrap_phase(phase_radians);
        Ok(Self {
            frequency_hz,
            initial_phase_radians: phase_radians,
            phase_radians,
            phase_increment: 0.0,
            chain: EffectChain::new(),
        })
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }
}

impl<S: Sample> Signal<S> for SineWave<S> {
    fn prepare(&mut self, sample_rate_hz: f64, _: usize, _: usize) -> Result<()> {
        self.phase_increment = TWO_PI * self.frequency_hz / sample_rate_hz;
        Ok(())
    }

    fn render_next_block(&mut self, output: &mut AudioBuffer<S>) {
        for frame in 0..output.num_frames() {
            let value = S::from_f64(self.phase_radians.sin());

            for channel in 0..output.num_channels() {
                output[channel][frame] = value;
            }

            self.phase_radians = wrap_phase(self.phase_radians + self.phase_increment);
        }
    }

    fn reset(&mut self) {
        self.phase_radians = self.initial_phase_radians;
    }

    fn describe(&self, precision: &Precision) -> String {
        format!(
            "SineWave ({} Hz, {} rad)",
            precision.hz(self.frequency_hz),
            precision.rad(self.initial_phase_radians)
        )
    }

    fn chain(&self) -> &EffectChain<S> {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut EffectChain<S> {
        &mut self.chain
    }

    fn box_clone(&self) -> Box<dyn Signal<S>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn render(signal: &mut SineWave<f64>, num_channels: usize, num_frames: usize) -> AudioBuffer<f64> {
        let mut block = AudioBuffer::new(num_channels, num_frames);
        signal.render_next_block(&mut block);
        block
    }

    #[test]
    fn test_rejects_non_positive_frequency() {
        assert!(SineWave::<f32>::new(0.0).is_err());
        assert!(SineWave::<f32>::new(-100.0).is_err());
        assert!(SineWave::<f32>::new(f64::NAN).is_err());
    }

    #[test]
    fn test_quarter_period_steps() {
        // fs = 4 * f: sin(0), sin(π/2), sin(π), sin(3π/2)
        let mut sine = SineWave::new(1000.0).unwrap();
        sine.prepare(4000.0, 1, 8).unwrap();

        let block = render(&mut sine, 1, 8);
        let expected = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
        for (actual, expected) in block[0].iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_initial_phase() {
        let mut sine = SineWave::with_phase(10.0, FRAC_PI_2).unwrap();
        sine.prepare(44_100.0, 1, 1).unwrap();
        assert_abs_diff_eq!(render(&mut sine, 1, 1)[0][0], 1.0, epsilon = 1e-12);

        let wrapped = SineWave::<f64>::with_phase(10.0, -FRAC_PI_2).unwrap();
        assert!(wrapped.describe(&Precision::default()).ends_with("4.712 rad)"));
    }

    #[test]
    fn test_all_channels_identical() {
        let mut sine = SineWave::new(997.0).unwrap();
        sine.prepare(44_100.0, 4, 100).unwrap();

        let block = render(&mut sine, 4, 100);
        for channel in 1..4 {
            assert_eq!(block.channel(channel), block.channel(0));
        }
    }

    #[test]
    fn test_reset_restarts() {
        let mut sine = SineWave::new(1234.0).unwrap();
        sine.prepare(48_000.0, 1, 64).unwrap();
        let first = render(&mut sine, 1, 64);

        render(&mut sine, 1, 37);
        sine.reset();
        assert_eq!(render(&mut sine, 1, 64), first);
    }

    #[test]
    fn test_describe() {
        let sine = SineWave::<f32>::new(1000.0).unwrap();
        assert_eq!(
            sine.describe(&Precision::default()),
            "SineWave (1000.0 Hz, 0.000 rad)"
        );
    }
}

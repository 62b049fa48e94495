//! Signal generators
//!
//! A [`Signal`] fills blocks with generated audio and owns an
//! [`EffectChain`] that post-processes every block in place. Chains are
//! built with [`Signal::followed_by`] or the `>>` operator:
//!
//! ```
//! use dsp_harness::dsp::{GainDb, HardClip};
//! use dsp_harness::signal::{Signal, SineWave};
//!
//! let signal: SineWave<f32> = SineWave::new(1000.0).unwrap() >> GainDb::new(1.0) >> HardClip::new(-3.0);
//! assert_eq!(signal.chain().len(), 2);
//! ```

mod silence;
mod sine_sweep;
mod sine_wave;
mod wav_file;
mod white_noise;

pub use silence::Silence;
pub use sine_sweep::{SineSweep, SweepType};
pub use sine_wave::SineWave;
pub use wav_file::WavFile;
pub use white_noise::WhiteNoise;

use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::{Effect, EffectChain};
use crate::error::{HarnessError, Result};
use crate::sample::Sample;

/// What a finite signal does once it reaches its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loop {
    /// Play once, then render silence
    #[default]
    No,
    /// Start over (sweeps reverse direction instead)
    Yes,
}

/// Base trait for all signals
pub trait Signal<S: Sample>: Send {
    /// Check if the signal can render `num_channels` channels
    fn supports_num_channels(&self, _num_channels: usize) -> bool {
        true
    }

    /// Check if the signal can render at `sample_rate_hz`
    fn supports_sample_rate(&self, _sample_rate_hz: f64) -> bool {
        true
    }

    /// Prepare for rendering, after layout and rate have been confirmed
    fn prepare(
        &mut self,
        sample_rate_hz: f64,
        num_channels: usize,
        max_block_frames: usize,
    ) -> Result<()>;

    /// Fill every frame of `output`
    fn render_next_block(&mut self, output: &mut AudioBuffer<S>);

    /// Rewind to the state right after construction
    fn reset(&mut self);

    /// Human-readable description, chain excluded
    fn describe(&self, precision: &Precision) -> String;

    /// Effects applied after generation
    fn chain(&self) -> &EffectChain<S>;

    /// Effects applied after generation, mutably
    fn chain_mut(&mut self) -> &mut EffectChain<S>;

    /// Clone the signal, chain included, into a boxed trait object
    fn box_clone(&self) -> Box<dyn Signal<S>>;

    // ------------------------------------------------------------------------
    // Provided
    // ------------------------------------------------------------------------

    /// Append an effect to the chain (builder form)
    fn followed_by<E>(mut self, effect: E) -> Self
    where
        Self: Sized,
        E: Effect<S> + 'static,
    {
        self.chain_mut().push(Box::new(effect));
        self
    }

    /// Validate layout and rate, then prepare the signal and every chained effect
    fn prepare_with_chain(
        &mut self,
        sample_rate_hz: f64,
        num_channels: usize,
        max_block_frames: usize,
    ) -> Result<()> {
        if !self.supports_num_channels(num_channels) {
            return Err(HarnessError::channel_layout(format!(
                "{} cannot render {} channels",
                self.describe(&Precision::default()),
                num_channels
            )));
        }

        if !self.supports_sample_rate(sample_rate_hz) {
            return Err(HarnessError::unsupported(format!(
                "{} cannot render at {} Hz",
                self.describe(&Precision::default()),
                sample_rate_hz
            )));
        }

        self.prepare(sample_rate_hz, num_channels, max_block_frames)?;
        self.chain_mut()
            .prepare(sample_rate_hz, num_channels, max_block_frames)
    }

    /// Render the next block and run it through the chain
    fn render_next_block_with_chain(&mut self, output: &mut AudioBuffer<S>) -> Result<()> {
        self.render_next_block(output);
        self.chain_mut().process_in_place(output)
    }

    /// Reset the signal, then every chained effect
    fn reset_with_chain(&mut self) {
        self.reset();
        self.chain_mut().reset();
    }

    /// Description with the chain appended, e.g. `SineWave (...) >> GainDb (...)`
    fn describe_with_chain(&self, precision: &Precision) -> String {
        if self.chain().is_empty() {
            self.describe(precision)
        } else {
            format!(
                "{} >> {}",
                self.describe(precision),
                self.chain().describe(precision)
            )
        }
    }
}

impl<S: Sample> Clone for Box<dyn Signal<S>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// `signal >> effect` as shorthand for `signal.followed_by(effect)`
macro_rules! impl_shr_for_signal {
    ($($signal:ident),+ $(,)?) => {
        $(
            impl<S: Sample, E: Effect<S> + 'static> std::ops::Shr<E> for $signal<S> {
                type Output = Self;

                fn shr(self, effect: E) -> Self {
                    self.followed_by(effect)
                }
            }
        )+
    };
}

impl_shr_for_signal!(SineWave, SineSweep, WhiteNoise, Silence, WavFile);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{GainDb, HardClip};

    #[test]
    fn test_followed_by_keeps_order() {
        let signal = Silence::<f32>::new()
            .followed_by(GainDb::new(1.0))
            .followed_by(HardClip::new(-3.0));

        assert_eq!(
            signal.describe_with_chain(&Precision::default()),
            "Silence >> GainDb (1.00 dB) >> HardClip (-3.00 dB)"
        );
    }

    #[test]
    fn test_shr_matches_followed_by() {
        let with_operator = Silence::<f64>::new() >> GainDb::new(1.0) >> HardClip::new(-3.0);
        let with_method = Silence::<f64>::new()
            .followed_by(GainDb::new(1.0))
            .followed_by(HardClip::new(-3.0));

        let precision = Precision::default();
        assert_eq!(
            with_operator.describe_with_chain(&precision),
            with_method.describe_with_chain(&precision)
        );
    }

    #[test]
    fn test_chain_processes_generated_block() {
        let mut signal = SineWave::<f32>::new(1000.0).unwrap() >> HardClip::new(-6.0);
        signal.prepare_with_chain(48_000.0, 2, 64).unwrap();

        let mut block = AudioBuffer::new(2, 64);
        signal.render_next_block_with_chain(&mut block).unwrap();

        let threshold = crate::units::db_to_ratio(-6.0) as f32;
        assert!(block.peak().unwrap() <= threshold + 1e-6);
        assert!(block.peak().unwrap() >= threshold - 1e-6);
    }

    #[test]
    fn test_prepare_with_chain_prepares_chain_envelopes() {
        use crate::dsp::params::GAIN_DB;
        use crate::envelope::SegmentedEnvelope;

        let gain = GainDb::new(0.0)
            .with_envelope(GAIN_DB, SegmentedEnvelope::new(-20.0))
            .unwrap();
        let mut signal = Silence::<f32>::new() >> gain;
        signal.prepare_with_chain(44_100.0, 1, 16).unwrap();

        let mut block = AudioBuffer::new(1, 16);
        signal.render_next_block_with_chain(&mut block).unwrap();
        assert!(block.channel(0).iter().all(|&s| s == 0.0));

        // The envelope is rejected at the signal's sample rate
        assert!(signal.prepare_with_chain(0.0, 1, 16).is_err());
    }

    #[test]
    fn test_box_clone_is_independent() {
        let mut original: Box<dyn Signal<f32>> =
            Box::new(SineWave::new(1000.0).unwrap() >> GainDb::new(-6.0));
        original.prepare_with_chain(44_100.0, 1, 32).unwrap();

        let mut first = AudioBuffer::new(1, 32);
        original.render_next_block_with_chain(&mut first).unwrap();

        let mut copy = original.clone();
        copy.reset_with_chain();
        let mut second = AudioBuffer::new(1, 32);
        copy.render_next_block_with_chain(&mut second).unwrap();

        assert_eq!(first, second);
        assert_eq!(copy.chain().len(), 1);
    }
}

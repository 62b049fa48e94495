//! Sine sweep

use super::{Loop, Signal};
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::EffectChain;
use crate::error::{HarnessError, Result};
use crate::sample::Sample;
use crate::units::{wrap_phase, TWO_PI};

/// How the frequency moves between start and end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepType {
    /// Constant Hz per second
    Linear,
    /// Constant octaves per second
    #[default]
    Log,
}

/// Unit-amplitude sine whose frequency sweeps from a start to an end value
///
/// With [`Loop::No`] the sweep plays once and silence follows. With
/// [`Loop::Yes`] it turns around at each end and sweeps back, so rendering
/// twice the sweep duration gives a low-high-low (or high-low-high) sweep.
#[derive(Debug, Clone)]
pub struct SineSweep<S: Sample> {
    duration_seconds: f64,
    start_frequency_hz: f64,
    end_frequency_hz: f64,
    sweep_type: SweepType,
    looping: Loop,
    initial_phase_radians: f64,

    sample_rate_hz: f64,
    duration_frames: usize,
    position_frames: usize,
    phase_radians: f64,
    reversed: bool,
    /// A non-looping sweep played through once
    ended: bool,
    chain: EffectChain<S>,
}

impl<S: Sample> SineSweep<S> {
    /// Create a sweep
    ///
    /// # Arguments
    /// * `duration_seconds` - Length of one sweep, zero renders silence
    /// * `start_frequency_hz` - Frequency at the start, must be positive
    /// * `end_frequency_hz` - Frequency at the end, must be positive
    /// * `sweep_type` - Linear or logarithmic frequency change
    /// * `looping` - Silence after the end, or sweep back and forth
    /// * `phase_radians` - Initial phase
    pub fn new(
        duration_seconds: f64,
        start_frequency_hz: f64,
        end_frequency_hz: f64,
        sweep_type: SweepType,
        looping: Loop,
        phase_radians: f64,
    ) -> Result<Self> {
        if duration_seconds.is_nan() || duration_seconds < 0.0 {
            return Err(HarnessError::configuration(format!(
                "Sweep duration cannot be negative: {} s",
                duration_seconds
            )));
        }

        if !(start_frequency_hz > 0.0 && end_frequency_hz > 0.0) {
            return Err(HarnessError::configuration(format!(
                "Sweep frequencies must be positive: {} Hz, {} Hz",
                start_frequency_hz, end_frequency_hz
            )));
        }

        let phase_radians = wrap_phase(phase_radians);
        Ok(Self {
            duration_seconds,
            start_frequency_hz,
            end_frequency_hz,
            sweep_type,
            looping,
            initial_phase_radians: phase_radians,
            sample_rate_hz: 44_100.0,
            duration_frames: 0,
            position_frames: 0,
            phase_radians,
            reversed: false,
            ended: false,
            chain: EffectChain::new(),
        })
    }

    pub fn with_duration(self, duration_seconds: f64) -> Result<Self> {
        self.rebuild(|s| s.duration_seconds = duration_seconds)
    }

    pub fn with_start_frequency(self, start_frequency_hz: f64) -> Result<Self> {
        self.rebuild(|s| s.start_frequency_hz = start_frequency_hz)
    }

    pub fn with_end_frequency(self, end_frequency_hz: f64) -> Result<Self> {
        self.rebuild(|s| s.end_frequency_hz = end_frequency_hz)
    }

    pub fn with_type(self, sweep_type: SweepType) -> Result<Self> {
        self.rebuild(|s| s.sweep_type = sweep_type)
    }

    pub fn with_loop(self, looping: Loop) -> Result<Self> {
        self.rebuild(|s| s.looping = looping)
    }

    pub fn with_phase(self, phase_radians: f64) -> Result<Self> {
        self.rebuild(|s| s.initial_phase_radians = phase_radians)
    }

    /// Re-validate after changing one setting, keeping the chain
    fn rebuild(mut self, change: impl FnOnce(&mut Self)) -> Result<Self> {
        change(&mut self);

        let mut rebuilt = Self::new(
            self.duration_seconds,
            self.start_frequency_hz,
            self.end_frequency_hz,
            self.sweep_type,
            self.looping,
            self.initial_phase_radians,
        )?;
        rebuilt.chain = self.chain;
        Ok(rebuilt)
    }

    fn frequency_at(&self, position_frames: usize) -> f64 {
        if self.start_frequency_hz == self.end_frequency_hz || self.duration_frames == 0 {
            return self.start_frequency_hz;
        }

        let elapsed_seconds = position_frames as f64 / self.sample_rate_hz;
        let mut portion = (elapsed_seconds / self.duration_seconds).min(1.0);
        if self.reversed {
            portion = 1.0 - portion;
        }

        match self.sweep_type {
            SweepType::Linear => {
                self.start_frequency_hz
                    + (self.end_frequency_hz - self.start_frequency_hz) * portion
            }
            SweepType::Log => {
                self.start_frequency_hz
                    * (self.end_frequency_hz / self.start_frequency_hz).powf(portion)
            }
        }
    }
}

impl<S: Sample> Signal<S> for SineSweep<S> {
    fn prepare(&mut self, sample_rate_hz: f64, _: usize, _: usize) -> Result<()> {
        self.sample_rate_hz = sample_rate_hz;
        self.duration_frames = (self.duration_seconds * sample_rate_hz).round() as usize;
        Ok(())
    }

    fn render_next_block(&mut self, output: &mut AudioBuffer<S>) {
        for frame in 0..output.num_frames() {
            // Durations rounding to zero frames render silence
            if self.ended || self.duration_frames == 0 {
                output.fill_silence_from(frame);
                return;
            }

            let value = S::from_f64(self.phase_radians.sin());
            for channel in 0..output.num_channels() {
                output[channel][frame] = value;
            }

            self.position_frames += 1;
            if self.position_frames >= self.duration_frames {
                self.position_frames = 0;

                match self.looping {
                    Loop::Yes => self.reversed = !self.reversed,
                    Loop::No => {
                        self.ended = true;
                        continue;
                    }
                }
            }

            let frequency_hz = self.frequency_at(self.position_frames);
            self.phase_radians =
                wrap_phase(self.phase_radians + TWO_PI * frequency_hz / self.sample_rate_hz);
        }
    }

    fn reset(&mut self) {
        self.position_frames = 0;
        self.phase_radians = self.initial_phase_radians;
        self.reversed = false;
        self.ended = false;
    }

    fn describe(&self, precision: &Precision) -> String {
        format!(
            "SineSweep ({} s, {} Hz, {} Hz, {:?}, Loop::{:?})",
            precision.sec(self.duration_seconds),
            precision.hz(self.start_frequency_hz),
            precision.hz(self.end_frequency_hz),
            self.sweep_type,
            self.looping
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

//! Gain effects
//!
//! [`GainDb`] and [`GainLinear`] apply a fixed or automated gain. Both work
//! N-to-N and as a 1-to-N multiplexer that copies the mono input into
//! every output channel.

use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::effect::{Automation, AutomationValues, Effect, ParamId};
use crate::dsp::params::{GAIN_DB, GAIN_LINEAR};
use crate::error::Result;
use crate::sample::Sample;
use crate::units::{db_to_ratio, ratio_to_db};
use std::marker::PhantomData;

// ============================================================================
// Helper Functions
// ============================================================================

/// Gain effects accept equal channel counts or a mono input
#[inline]
fn supports_gain_layout(num_input_channels: usize, num_output_channels: usize) -> bool {
    num_input_channels == num_output_channels || num_input_channels == 1
}

/// Multiply `input` by a per-frame gain into `output`
///
/// With fewer input than output channels, input channel 0 feeds every output.
fn apply_gain<S: Sample>(
    input: &AudioBuffer<S>,
    output: &mut AudioBuffer<S>,
    gain_at: impl Fn(usize) -> f64,
) {
    let multiplexer = input.num_channels() != output.num_channels();

    for channel in 0..output.num_channels() {
        let source = input.channel(if multiplexer { 0 } else { channel });

        for (frame, (out, &sample)) in output
            .channel_mut(channel)
            .iter_mut()
            .zip(source.iter())
            .enumerate()
        {
            *out = S::from_f64(sample.as_f64() * gain_at(frame));
        }
    }
}

// ============================================================================
// GainDb
// ============================================================================

/// Gain in decibels
///
/// Envelopes attached to [`GAIN_DB`] are read in dB. Gains at or
/// below -120 dB, `-inf` included, mute the output.
#[derive(Debug, Clone)]
pub struct GainDb<S> {
    initial_gain_db: f64,
    gain_linear: f64,
    gains: Vec<f64>,
    automation: Automation,
    _sample: PhantomData<S>,
}

impl<S: Sample> GainDb<S> {
    pub fn new(gain_db: f64) -> Self {
        Self {
            initial_gain_db: gain_db,
            gain_linear: db_to_ratio(gain_db),
            gains: Vec::new(),
            automation: Automation::new(),
            _sample: PhantomData,
        }
    }
}

impl<S: Sample> Default for GainDb<S> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<S: Sample> Effect<S> for GainDb<S> {
    fn prepare(&mut self, _: f64, _: usize, _: usize, max_block_frames: usize) -> Result<()> {
        self.gains = Vec::with_capacity(max_block_frames);
        Ok(())
    }

    fn process(
        &mut self,
        input: &AudioBuffer<S>,
        output: &mut AudioBuffer<S>,
        automation: &AutomationValues<'_>,
    ) -> Result<()> {
        self.check_layout(input, output)?;

        match automation.get(GAIN_DB) {
            Some(gains_db) => {
                self.gains.clear();
                self.gains.extend(gains_db.iter().map(|&db| db_to_ratio(db)));
                let gains = &self.gains;
                apply_gain(input, output, |frame| gains[frame]);
            }
            None => {
                let gain = self.gain_linear;
                apply_gain(input, output, |_| gain);
            }
        }

        Ok(())
    }

    fn reset(&mut self) {}

    fn set_value(&mut self, id: ParamId, value: f64) {
        if id == GAIN_DB {
            self.gain_linear = db_to_ratio(value);
        }
    }

    fn value(&self, id: ParamId) -> f64 {
        if id == GAIN_DB {
            ratio_to_db(self.gain_linear)
        } else {
            0.0
        }
    }

    fn supports_channel_layout(&self, num_input_channels: usize, num_output_channels: usize) -> bool {
        supports_gain_layout(num_input_channels, num_output_channels)
    }

    fn supports_envelope_for(&self, id: ParamId) -> bool {
        id == GAIN_DB
    }

    fn describe(&self, precision: &Precision) -> String {
        format!("GainDb ({} dB)", precision.db(self.initial_gain_db))
    }

    fn automation(&self) -> &Automation {
        &self.automation
    }

    fn automation_mut(&mut self) -> &mut Automation {
        &mut self.automation
    }

    fn box_clone(&self) -> Box<dyn Effect<S>> {
        Box::new(self.clone())
    }
}

// ============================================================================
// GainLinear
// ============================================================================

/// Gain as a linear ratio
///
/// Envelopes attached to [`GAIN_LINEAR`] are read as ratios.
#[derive(Debug, Clone)]
pub struct GainLinear<S> {
    initial_gain: f64,
    gain: f64,
    automation: Automation,
    _sample: PhantomData<S>,
}

impl<S: Sample> GainLinear<S> {
    pub fn new(gain: f64) -> Self {
        Self {
            initial_gain: gain,
            gain,
            automation: Automation::new(),
            _sample: PhantomData,
        }
    }
}

impl<S: Sample> Default for GainLinear<S> {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<S: Sample> Effect<S> for GainLinear<S> {
    fn prepare(&mut self, _: f64, _: usize, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn process(
        &mut self,
        input: &AudioBuffer<S>,
        output: &mut AudioBuffer<S>,
        automation: &AutomationValues<'_>,
    ) -> Result<()> {
        self.check_layout(input, output)?;

        match automation.get(GAIN_LINEAR) {
            Some(gains) => apply_gain(input, output, |frame| gains[frame]),
            None => {
                let gain = self.gain;
                apply_gain(input, output, |_| gain);
            }
        }

        Ok(())
    }

    fn reset(&mut self) {}

    fn set_value(&mut self, id: ParamId, value: f64) {
        if id == GAIN_LINEAR {
            self.gain = value;
        }
    }

    fn value(&self, id: ParamId) -> f64 {
        if id == GAIN_LINEAR {
            self.gain
        } else {
            0.0
        }
    }

    fn supports_channel_layout(&self, num_input_channels: usize, num_output_channels: usize) -> bool {
        supports_gain_layout(num_input_channels, num_output_channels)
    }

    fn supports_envelope_for(&self, id: ParamId) -> bool {
        id == GAIN_LINEAR
    }

    fn describe(&self, precision: &Precision) -> String {
        format!("GainLinear ({})", precision.lin(self.initial_gain))
    }

    fn automation(&self) -> &Automation {
        &self.automation
    }

    fn automation_mut(&mut self) -> &mut Automation {
        &mut self.automation
    }

    fn box_clone(&self) -> Box<dyn Effect<S>> {
        Box::new(self.clone())
    }
}

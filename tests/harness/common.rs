//! Shared aliases and helpers

#![allow(dead_code)]

use dsp_harness::audio::AudioBuffer;
use dsp_harness::dsp::{Automation, AutomationValues, Effect, GainDb, GainLinear, HardClip, ParamId};
use dsp_harness::signal::{SineSweep, SineWave, WhiteNoise};
use dsp_harness::{Precision, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type Buffer = AudioBuffer<f32>;
pub type Gain = GainDb<f32>;
pub type LinearGain = GainLinear<f32>;
pub type Clip = HardClip<f32>;
pub type Sine = SineWave<f32>;
pub type Sweep = SineSweep<f32>;
pub type Noise = WhiteNoise<f32>;

pub fn sine(frequency_hz: f64) -> Sine {
    Sine::new(frequency_hz).unwrap()
}

/// Largest magnitude of one channel
pub fn channel_peak(buffer: &Buffer, channel: usize) -> f64 {
    buffer
        .channel(channel)
        .iter()
        .fold(0.0_f64, |peak, &s| peak.max(f64::from(s).abs()))
}

/// Pass-through effect that counts processed blocks
#[derive(Debug, Clone, Default)]
pub struct BlockCounter {
    pub blocks: Arc<AtomicUsize>,
    automation: Automation,
}

impl BlockCounter {
    pub fn count(&self) -> usize {
        self.blocks.load(Ordering::SeqCst)
    }
}

impl Effect<f32> for BlockCounter {
    fn prepare(&mut self, _: f64, _: usize, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn process(
        &mut self,
        input: &Buffer,
        output: &mut Buffer,
        _: &AutomationValues<'_>,
    ) -> Result<()> {
        self.blocks.fetch_add(1, Ordering::SeqCst);
        output.copy_from(input)
    }

    fn reset(&mut self) {}

    fn set_value(&mut self, _: ParamId, _: f64) {}

    fn value(&self, _: ParamId) -> f64 {
        0.0
    }

    fn supports_channel_layout(&self, num_input_channels: usize, num_output_channels: usize) -> bool {
        num_input_channels == num_output_channels
    }

    fn supports_envelope_for(&self, _: ParamId) -> bool {
        false
    }

    fn describe(&self, _: &Precision) -> String {
        "BlockCounter".to_string()
    }

    fn automation(&self) -> &Automation {
        &self.automation
    }

    fn automation_mut(&mut self) -> &mut Automation {
        &mut self.automation
    }

    fn box_clone(&self) -> Box<dyn Effect<f32>> {
        Box::new(self.clone())
    }
}

//! Hard clipper

use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::effect::{Automation, AutomationValues, Effect, ParamId};
use crate::dsp::params::THRESHOLD_DB;
use crate::error::Result;
use crate::sample::Sample;
use crate::units::{db_to_ratio, ratio_to_db};
use std::marker::PhantomData;

/// Clamps every sample to `±threshold`
///
/// N-to-N only; the threshold cannot be automated.
#[derive(Debug, Clone)]
pub struct HardClip<S> {
    initial_threshold_db: f64,
    threshold_linear: f64,
    automation: Automation,
    _sample: PhantomData<S>,
}

impl<S: Sample> HardClip<S> {
    pub fn new(threshold_db: f64) -> Self {
        Self {
            initial_threshold_db: threshold_db,
            threshold_linear: db_to_ratio(threshold_db),
            automation: Automation::new(),
            _sample: PhantomData,
        }
    }
}

impl<S: Sample> Default for HardClip<S> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<S: Sample> Effect<S> for HardClip<S> {
    fn prepare(&mut self, _: f64, _: usize, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn process(
        &mut self,
        input: &AudioBuffer<S>,
        output: &mut AudioBuffer<S>,
        _automation: &AutomationValues<'_>,
    ) -> Result<()> {
        self.check_layout(input, output)?;

        let threshold = S::from_f64(self.threshold_linear);

        for channel in 0..input.num_channels() {
            for (out, &sample) in output
                .channel_mut(channel)
                .iter_mut()
                .zip(input.channel(channel))
            {
                *out = sample.max(-threshold).min(threshold);
            }
        }

        Ok(())
    }

    fn reset(&mut self) {}

    fn set_value(&mut self, id: ParamId, value: f64) {
        if id == THRESHOLD_DB {
            self.threshold_linear = db_to_ratio(value);
        }
    }

    fn value(&self, id: ParamId) -> f64 {
        if id == THRESHOLD_DB {
            ratio_to_db(self.threshold_linear)
        } else {
            0.0
        }
    }

    fn supports_channel_layout(&self, num_input_channels: usize, num_output_channels: usize) -> bool {
        num_input_channels == num_output_channels
    }

    fn supports_envelope_for(&self, _id: ParamId) -> bool {
        false
    }

    fn describe(&self, precision: &Precision) -> String {
        format!("HardClip ({} dB)", precision.db(self.initial_threshold_db))
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

//! Effect trait definition
//!
//! Base trait for all effects under test, plus the per-parameter
//! automation store every effect carries.

use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::envelope::Envelope;
use crate::error::{HarnessError, Result};
use crate::sample::Sample;
use std::collections::BTreeMap;

/// Integer parameter identifier, defined per effect (see [`params`](super::params))
pub type ParamId = u32;

// ============================================================================
// Automation
// ============================================================================

/// Envelopes attached to an effect's parameters
///
/// While the effect is prepared this also holds one value buffer per
/// automated parameter, sized to the maximum block length.
#[derive(Debug, Clone, Default)]
pub struct Automation {
    envelopes: BTreeMap<ParamId, Box<dyn Envelope>>,
    buffers: BTreeMap<ParamId, Vec<f64>>,
}

impl Automation {
    /// Create an empty automation store
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an envelope is attached for `id`
    pub fn has_envelope_for(&self, id: ParamId) -> bool {
        self.envelopes.contains_key(&id)
    }

    /// Parameters that have an envelope attached
    pub fn automated_params(&self) -> impl Iterator<Item = ParamId> + '_ {
        self.envelopes.keys().copied()
    }

    /// Number of attached envelopes
    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    /// Check if no envelope is attached
    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    fn attach(&mut self, id: ParamId, envelope: Box<dyn Envelope>) {
        self.envelopes.insert(id, envelope);
    }

    /// Prepare and rewind every envelope whose parameter passes `supports`,
    /// and allocate its value buffer
    fn prepare(
        &mut self,
        sample_rate_hz: f64,
        max_block_frames: usize,
        supports: impl Fn(ParamId) -> bool,
    ) -> Result<()> {
        self.buffers.clear();

        for (&id, envelope) in self.envelopes.iter_mut() {
            if !supports(id) {
                continue;
            }

            envelope.prepare(sample_rate_hz, max_block_frames)?;
            envelope.reset();
            self.buffers.insert(id, vec![0.0; max_block_frames]);
        }

        Ok(())
    }

    /// First envelope that is supported but has no value buffer yet
    fn unprepared(&self, supports: impl Fn(ParamId) -> bool) -> Option<ParamId> {
        self.automated_params()
            .find(|&id| supports(id) && !self.buffers.contains_key(&id))
    }

    fn reset(&mut self) {
        for envelope in self.envelopes.values_mut() {
            envelope.reset();
        }
    }

    /// Render the next `num_frames` values of every prepared envelope
    fn render(&mut self, num_frames: usize) -> Result<AutomationValues<'_>> {
        let Self { envelopes, buffers } = self;

        for (id, buffer) in buffers.iter_mut() {
            if num_frames > buffer.len() {
                return Err(HarnessError::size(format!(
                    "Block of {} frames exceeds the prepared maximum of {}",
                    num_frames,
                    buffer.len()
                )));
            }

            if let Some(envelope) = envelopes.get_mut(id) {
                envelope.render_next_block(&mut buffer[..num_frames]);
            }
        }

        Ok(AutomationValues {
            values: buffers
                .iter()
                .map(|(&id, buffer)| (id, &buffer[..num_frames]))
                .collect(),
        })
    }
}

/// Per-frame parameter values for one block
///
/// Holds an entry for every parameter that has an envelope attached and is
/// automatable; parameters without an entry keep their scalar value.
#[derive(Debug, Clone, Default)]
pub struct AutomationValues<'a> {
    values: BTreeMap<ParamId, &'a [f64]>,
}

impl<'a> AutomationValues<'a> {
    /// No automated parameters
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from explicit slices, mostly useful when calling
    /// [`Effect::process`] directly
    pub fn from_slices(values: impl IntoIterator<Item = (ParamId, &'a [f64])>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Values of `id` for this block, if automated
    pub fn get(&self, id: ParamId) -> Option<&'a [f64]> {
        self.values.get(&id).copied()
    }

    /// Value of `id` at `frame`, or `fallback` when not automated
    pub fn value_at(&self, id: ParamId, frame: usize, fallback: f64) -> f64 {
        self.get(id)
            .and_then(|values| values.get(frame).copied())
            .unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Effect
// ============================================================================

/// Base trait for all effects
///
/// Implementors provide the DSP (`prepare`, `process`, `reset`), a scalar
/// parameter model and their channel-layout contract. The provided
/// `*_with_automation` methods drive attached envelopes around `process`
/// and are what signals and test runs call.
pub trait Effect<S: Sample>: Send {
    /// Allocate per-block state
    ///
    /// Called once before the first `process`, after the channel layout
    /// and sample rate have been confirmed as supported.
    fn prepare(
        &mut self,
        sample_rate_hz: f64,
        num_input_channels: usize,
        num_output_channels: usize,
        max_block_frames: usize,
    ) -> Result<()>;

    /// Process one block
    ///
    /// `input` and `output` have the same frame count. `automation` holds
    /// this block's values for every automated parameter.
    fn process(
        &mut self,
        input: &AudioBuffer<S>,
        output: &mut AudioBuffer<S>,
        automation: &AutomationValues<'_>,
    ) -> Result<()>;

    /// Restore power-on DSP state (attached envelopes are not touched)
    fn reset(&mut self);

    /// Set a fixed parameter value
    fn set_value(&mut self, id: ParamId, value: f64);

    /// Get a parameter's current scalar value
    fn value(&self, id: ParamId) -> f64;

    /// Check if the effect can map `num_input_channels` to `num_output_channels`
    fn supports_channel_layout(&self, num_input_channels: usize, num_output_channels: usize)
        -> bool;

    /// Check if the effect can run at `sample_rate_hz`
    fn supports_sample_rate(&self, _sample_rate_hz: f64) -> bool {
        true
    }

    /// Check if parameter `id` accepts an envelope
    fn supports_envelope_for(&self, id: ParamId) -> bool;

    /// Human-readable description, used in failure reports
    fn describe(&self, precision: &Precision) -> String;

    /// Attached envelopes
    fn automation(&self) -> &Automation;

    /// Attached envelopes, mutably
    fn automation_mut(&mut self) -> &mut Automation;

    /// Clone the effect, envelopes included, into a boxed trait object
    fn box_clone(&self) -> Box<dyn Effect<S>>;

    // ------------------------------------------------------------------------
    // Provided
    // ------------------------------------------------------------------------

    /// Attach an envelope to parameter `id` (builder form)
    fn with_envelope(mut self, id: ParamId, envelope: impl Envelope + 'static) -> Result<Self>
    where
        Self: Sized,
    {
        self.attach_envelope(id, Box::new(envelope))?;
        Ok(self)
    }

    /// Attach an envelope to parameter `id`
    ///
    /// Fails with [`HarnessError::Unsupported`] if the parameter is not
    /// automatable. An envelope already attached to `id` is replaced.
    fn attach_envelope(&mut self, id: ParamId, envelope: Box<dyn Envelope>) -> Result<()> {
        if !self.supports_envelope_for(id) {
            return Err(HarnessError::unsupported(format!(
                "{} does not support an envelope for parameter {}",
                self.describe(&Precision::default()),
                id
            )));
        }

        self.automation_mut().attach(id, envelope);
        Ok(())
    }

    /// Check if an envelope is attached for `id`
    fn has_envelope_for(&self, id: ParamId) -> bool {
        self.automation().has_envelope_for(id)
    }

    /// Fail unless the buffers' channel counts are a supported layout
    fn check_layout(&self, input: &AudioBuffer<S>, output: &AudioBuffer<S>) -> Result<()> {
        if !self.supports_channel_layout(input.num_channels(), output.num_channels()) {
            return Err(HarnessError::channel_layout(format!(
                "{} does not support {} input and {} output channels",
                self.describe(&Precision::default()),
                input.num_channels(),
                output.num_channels()
            )));
        }

        Ok(())
    }

    /// Validate the layout and sample rate, prepare attached envelopes, then
    /// call [`Effect::prepare`]
    fn prepare_with_automation(
        &mut self,
        sample_rate_hz: f64,
        num_input_channels: usize,
        num_output_channels: usize,
        max_block_frames: usize,
    ) -> Result<()> {
        if !self.supports_channel_layout(num_input_channels, num_output_channels) {
            return Err(HarnessError::channel_layout(format!(
                "{} does not support {} input and {} output channels",
                self.describe(&Precision::default()),
                num_input_channels,
                num_output_channels
            )));
        }

        if !self.supports_sample_rate(sample_rate_hz) {
            return Err(HarnessError::unsupported(format!(
                "{} does not support a sample rate of {} Hz",
                self.describe(&Precision::default()),
                sample_rate_hz
            )));
        }

        let mut automation = std::mem::take(self.automation_mut());
        let prepared =
            automation.prepare(sample_rate_hz, max_block_frames, |id| self.supports_envelope_for(id));
        *self.automation_mut() = automation;
        prepared?;

        self.prepare(
            sample_rate_hz,
            num_input_channels,
            num_output_channels,
            max_block_frames,
        )
    }

    /// Render this block's envelope values and call [`Effect::process`]
    fn process_with_automation(
        &mut self,
        input: &AudioBuffer<S>,
        output: &mut AudioBuffer<S>,
    ) -> Result<()> {
        if input.num_frames() != output.num_frames() {
            return Err(HarnessError::size(format!(
                "Input has {} frames but output has {}",
                input.num_frames(),
                output.num_frames()
            )));
        }

        self.check_layout(input, output)?;

        if let Some(id) = self.automation().unprepared(|id| self.supports_envelope_for(id)) {
            return Err(HarnessError::state(format!(
                "Envelope for parameter {} was attached after prepare",
                id
            )));
        }

        let mut automation = std::mem::take(self.automation_mut());
        let result = automation
            .render(input.num_frames())
            .and_then(|values| self.process(input, output, &values));
        *self.automation_mut() = automation;
        result
    }

    /// Rewind every attached envelope
    fn reset_automation(&mut self) {
        self.automation_mut().reset();
    }
}

impl<S: Sample> Clone for Box<dyn Effect<S>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

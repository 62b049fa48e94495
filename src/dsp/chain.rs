//! Effect chain owned by a signal
//!
//! Effects run in insertion order (index 0 first), each one reading the
//! previous effect's output and writing back into the same block.

use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::Effect;
use crate::error::Result;
use crate::sample::Sample;

/// Ordered, exclusively owned effects applied in place
#[derive(Clone)]
pub struct EffectChain<S: Sample> {
    effects: Vec<Box<dyn Effect<S>>>,
    scratch: AudioBuffer<S>,
}

impl<S: Sample> EffectChain<S> {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
            scratch: AudioBuffer::new(0, 0),
        }
    }

    /// Append an effect at the end of the chain
    pub fn push(&mut self, effect: Box<dyn Effect<S>>) {
        self.effects.push(effect);
    }

    /// Get the number of effects in the chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over effects in processing order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Effect<S>> {
        self.effects.iter().map(|e| e.as_ref())
    }

    /// Prepare every effect for an N-to-N layout
    ///
    /// Fails on the first effect that rejects the layout or sample rate.
    pub fn prepare(
        &mut self,
        sample_rate_hz: f64,
        num_channels: usize,
        max_block_frames: usize,
    ) -> Result<()> {
        for effect in &mut self.effects {
            effect.prepare_with_automation(
                sample_rate_hz,
                num_channels,
                num_channels,
                max_block_frames,
            )?;
        }

        self.scratch = AudioBuffer::new(num_channels, max_block_frames);
        Ok(())
    }

    /// Reset every effect and rewind its envelopes
    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
            effect.reset_automation();
        }
    }

    /// Run `buffer` through every effect, replacing its contents
    pub fn process_in_place(&mut self, buffer: &mut AudioBuffer<S>) -> Result<()> {
        let Self { effects, scratch } = self;

        for effect in effects.iter_mut() {
            if scratch.num_channels() == buffer.num_channels() {
                scratch.copy_from(buffer)?;
            } else {
                *scratch = buffer.clone();
            }

            effect.process_with_automation(scratch, buffer)?;
        }

        Ok(())
    }

    /// Effects joined with ` >> `
    pub fn describe(&self, precision: &Precision) -> String {
        self.effects
            .iter()
            .map(|e| e.describe(precision))
            .collect::<Vec<_>>()
            .join(" >> ")
    }
}

impl<S: Sample> Default for EffectChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> std::fmt::Debug for EffectChain<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectChain")
            .field("effects", &self.describe(&Precision::default()))
            .finish()
    }
}

//! Silence

use super::Signal;
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::EffectChain;
use crate::error::Result;
use crate::sample::Sample;

/// All-zero signal, any channel count
#[derive(Debug, Clone)]
pub struct Silence<S: Sample> {
    chain: EffectChain<S>,
}

impl<S: Sample> Silence<S> {
    pub fn new() -> Self {
        Self {
            chain: EffectChain::new(),
        }
    }
}

impl<S: Sample> Default for Silence<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> Signal<S> for Silence<S> {
    fn prepare(&mut self, _: f64, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn render_next_block(&mut self, output: &mut AudioBuffer<S>) {
        output.fill(S::zero());
    }

    fn reset(&mut self) {}

    fn describe(&self, _: &Precision) -> String {
        "Silence".to_string()
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

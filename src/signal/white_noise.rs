//! Seeded white noise

use super::Signal;
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::dsp::EffectChain;
use crate::error::Result;
use crate::sample::Sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform white noise in `[-1, 1)`
///
/// Channels are independent. The generator is reseeded on every reset, so
/// the same seed always renders the same samples.
#[derive(Debug, Clone)]
pub struct WhiteNoise<S: Sample> {
    seed: u64,
    rng: StdRng,
    chain: EffectChain<S>,
}

impl<S: Sample> WhiteNoise<S> {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            chain: EffectChain::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<S: Sample> Signal<S> for WhiteNoise<S> {
    fn prepare(&mut self, _: f64, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn render_next_block(&mut self, output: &mut AudioBuffer<S>) {
        for frame in 0..output.num_frames() {
            for channel in 0..output.num_channels() {
                output[channel][frame] = S::from_f64(self.rng.gen_range(-1.0..1.0));
            }
        }
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn describe(&self, _: &Precision) -> String {
        format!("WhiteNoise ({})", self.seed)
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

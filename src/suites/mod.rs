//! Built-in self-check suites
//!
//! Exercises the harness with its own effects and signals. The runner
//! binary registers these with [`builtin_registry`].

mod chain_order;
mod envelope;
mod gain;
mod hard_clip;
mod layouts;
mod signals;

use crate::dsp::{GainDb, GainLinear, HardClip};
use crate::runner::TestRegistry;
use crate::signal::{SineSweep, SineWave, WavFile, WhiteNoise};

type Gain = GainDb<f32>;
type LinearGain = GainLinear<f32>;
type Clip = HardClip<f32>;
type Sine = SineWave<f32>;
type Sweep = SineSweep<f32>;
type Noise = WhiteNoise<f32>;
type Wav = WavFile<f32>;

pub use envelope::GAIN_ENVELOPE_WAV;

/// Registry holding every built-in test and generator
pub fn builtin_registry() -> TestRegistry {
    let mut registry = TestRegistry::new();

    gain::register(&mut registry);
    layouts::register(&mut registry);
    hard_clip::register(&mut registry);
    chain_order::register(&mut registry);
    signals::register(&mut registry);
    envelope::register(&mut registry);

    registry
}

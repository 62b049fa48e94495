//! dsp-harness - Offline Test Harness for Audio Effects
//!
//! Renders signals through an effect block by block, as a host would, and
//! checks the output with audio matchers.
//!
//! # Architecture
//!
//! - [`signal`]: generators (sine, sweep, noise, silence, wav files), each
//!   with an optional chain of effects applied to every block
//! - [`dsp`]: the [`Effect`](dsp::Effect) trait, parameter automation and
//!   a few reference effects
//! - [`envelope`]: per-frame automation curves
//! - [`matcher`]: predicates over rendered audio
//! - [`runner`]: test runs, the per-test failure accumulator and the test
//!   registry
//! - [`audio`]: the sample buffer plus wav and plot output

pub mod audio;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod envelope;
pub mod error;
pub mod matcher;
pub mod runner;
pub mod sample;
pub mod signal;
pub mod suites;
pub mod units;

pub use audio::AudioBuffer;
pub use config::{HarnessConfig, Precision};
pub use error::{HarnessError, Result};
pub use runner::{process_audio_with, TestContext, TestRegistry};
pub use sample::Sample;

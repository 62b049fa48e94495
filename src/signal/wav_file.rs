//! Wav file playback

use super::{Loop, Signal};
use crate::audio::{read_wav, AudioBuffer};
use crate::config::{HarnessConfig, Precision};
use crate::dsp::EffectChain;
use crate::error::Result;
use crate::sample::Sample;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Plays back the contents of a wav file
///
/// The file is decoded once at construction; clones share the decoded
/// samples. Only the file's own channel count and sample rate are
/// supported, there is no resampling or channel mapping.
#[derive(Debug, Clone)]
pub struct WavFile<S: Sample> {
    path: PathBuf,
    looping: Loop,
    frames: Arc<AudioBuffer<S>>,
    sample_rate_hz: f64,
    position_frames: usize,
    chain: EffectChain<S>,
}

impl<S: Sample> WavFile<S> {
    /// Decode the wav file at `path`
    pub fn open(path: impl AsRef<Path>, looping: Loop) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = read_wav::<S>(&path)?;

        Ok(Self {
            path,
            looping,
            frames: Arc::new(data.buffer),
            sample_rate_hz: data.sample_rate_hz,
            position_frames: 0,
            chain: EffectChain::new(),
        })
    }

    /// Decode a wav file, resolving relative paths against the data root
    pub fn open_in(config: &HarnessConfig, path: impl AsRef<Path>, looping: Loop) -> Result<Self> {
        Self::open(config.resolve_path(path), looping)
    }

    pub fn num_channels(&self) -> usize {
        self.frames.num_channels()
    }

    pub fn num_frames(&self) -> usize {
        self.frames.num_frames()
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
}

impl<S: Sample> Signal<S> for WavFile<S> {
    fn supports_num_channels(&self, num_channels: usize) -> bool {
        num_channels == self.frames.num_channels()
    }

    fn supports_sample_rate(&self, sample_rate_hz: f64) -> bool {
        (sample_rate_hz - self.sample_rate_hz).abs() < 1e-6
    }

    fn prepare(&mut self, _: f64, _: usize, _: usize) -> Result<()> {
        Ok(())
    }

    fn render_next_block(&mut self, output: &mut AudioBuffer<S>) {
        let length = self.frames.num_frames();

        for frame in 0..output.num_frames() {
            if self.position_frames >= length {
                output.fill_silence_from(frame);
                return;
            }

            for channel in 0..output.num_channels() {
                output[channel][frame] = self.frames[channel][self.position_frames];
            }

            self.position_frames += 1;
            if self.looping == Loop::Yes && self.position_frames == length {
                self.position_frames = 0;
            }
        }
    }

    fn reset(&mut self) {
        self.position_frames = 0;
    }

    fn describe(&self, _: &Precision) -> String {
        format!("WavFile (\"{}\", Loop::{:?})", self.path.display(), self.looping)
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

//! Multi-channel audio buffer
//!
//! Samples are stored channel after channel in one contiguous allocation,
//! so every channel is addressable as a slice. The channel count is fixed
//! when the buffer is created; the frame count only changes through
//! [`AudioBuffer::append_from`], [`AudioBuffer::copy_from`] and
//! [`AudioBuffer::clear`].

use crate::error::{HarnessError, Result};
use crate::sample::Sample;
use std::ops::{Index, IndexMut};

/// Fixed-channel-count audio buffer
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer<S: Sample> {
    num_channels: usize,
    num_frames: usize,
    samples: Vec<S>,
}

impl<S: Sample> AudioBuffer<S> {
    /// Create a zero-filled buffer
    ///
    /// # Arguments
    /// * `num_channels` - Channel count, fixed for the lifetime of the buffer
    /// * `num_frames` - Initial frame count
    pub fn new(num_channels: usize, num_frames: usize) -> Self {
        Self {
            num_channels,
            num_frames,
            samples: vec![S::zero(); num_channels * num_frames],
        }
    }

    /// Create a zero-filled buffer with the same shape as `other`
    pub fn empty_like(other: &AudioBuffer<S>) -> Self {
        Self::new(other.num_channels, other.num_frames)
    }

    /// Build a buffer from per-channel sample vectors
    ///
    /// All channels must have the same length.
    pub fn from_channels(channels: Vec<Vec<S>>) -> Result<Self> {
        let num_channels = channels.len();
        let num_frames = channels.first().map_or(0, Vec::len);

        if let Some(bad) = channels.iter().position(|c| c.len() != num_frames) {
            return Err(HarnessError::channel_layout(format!(
                "Channel {} has {} frames, expected {}",
                bad,
                channels[bad].len(),
                num_frames
            )));
        }

        Ok(Self {
            num_channels,
            num_frames,
            samples: channels.into_iter().flatten().collect(),
        })
    }

    /// Build a buffer from frame-interleaved samples
    pub fn from_interleaved(interleaved: &[S], num_channels: usize) -> Result<Self> {
        if num_channels == 0 || interleaved.len() % num_channels != 0 {
            return Err(HarnessError::channel_layout(format!(
                "{} interleaved samples cannot be split into {} channels",
                interleaved.len(),
                num_channels
            )));
        }

        let num_frames = interleaved.len() / num_channels;
        let mut buffer = Self::new(num_channels, num_frames);

        for (i, &sample) in interleaved.iter().enumerate() {
            let frame = i / num_channels;
            let channel = i % num_channels;
            buffer.samples[channel * num_frames + frame] = sample;
        }

        Ok(buffer)
    }

    /// Get the number of channels
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Get the number of frames
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Check if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.num_frames == 0
    }

    /// Get one channel as a slice
    ///
    /// # Panics
    /// Panics if `channel >= num_channels()`; use
    /// [`try_channel`](AudioBuffer::try_channel) for checked access.
    pub fn channel(&self, channel: usize) -> &[S] {
        let start = channel * self.num_frames;
        &self.samples[start..start + self.num_frames]
    }

    /// Get one channel as a mutable slice
    ///
    /// # Panics
    /// Panics if `channel >= num_channels()`.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [S] {
        let start = channel * self.num_frames;
        &mut self.samples[start..start + self.num_frames]
    }

    /// Checked channel access
    ///
    /// Fails with [`HarnessError::Index`] if `channel >= num_channels()`.
    pub fn try_channel(&self, channel: usize) -> Result<&[S]> {
        self.check_channel_index(channel)?;
        Ok(self.channel(channel))
    }

    /// Checked mutable channel access
    pub fn try_channel_mut(&mut self, channel: usize) -> Result<&mut [S]> {
        self.check_channel_index(channel)?;
        Ok(self.channel_mut(channel))
    }

    fn check_channel_index(&self, channel: usize) -> Result<()> {
        if channel >= self.num_channels {
            return Err(HarnessError::index(format!(
                "Channel {} out of range, buffer has {} channels",
                channel, self.num_channels
            )));
        }

        Ok(())
    }

    /// Iterate over channels
    pub fn channels(&self) -> impl Iterator<Item = &[S]> {
        // chunks_exact(0) panics, and zero-frame buffers have nothing to yield anyway
        let chunk = self.num_frames.max(1);
        self.samples.chunks_exact(chunk).take(self.num_channels)
    }

    /// Checked single-sample access
    pub fn get(&self, channel: usize, frame: usize) -> Option<S> {
        if channel < self.num_channels && frame < self.num_frames {
            Some(self.samples[channel * self.num_frames + frame])
        } else {
            None
        }
    }

    /// Set every sample to `value`
    pub fn fill(&mut self, value: S) {
        self.samples.iter_mut().for_each(|s| *s = value);
    }

    /// Zero the frames from `start_frame` to the end in every channel
    pub fn fill_silence_from(&mut self, start_frame: usize) {
        for channel in 0..self.num_channels {
            let samples = self.channel_mut(channel);
            if start_frame < samples.len() {
                samples[start_frame..].iter_mut().for_each(|s| *s = S::zero());
            }
        }
    }

    /// Drop all frames, keeping the channel count
    pub fn clear(&mut self) {
        self.samples.clear();
        self.num_frames = 0;
    }

    /// Replace this buffer's contents with a copy of `other`
    ///
    /// The frame count follows `other`; the channel counts must match.
    pub fn copy_from(&mut self, other: &AudioBuffer<S>) -> Result<()> {
        self.check_same_channels(other, "copy")?;

        self.samples.clear();
        self.samples.extend_from_slice(&other.samples);
        self.num_frames = other.num_frames;
        Ok(())
    }

    /// Append all frames of `other` after this buffer's frames
    ///
    /// Storage is reallocated to the combined length and both buffers'
    /// frames are copied in, channel by channel.
    pub fn append_from(&mut self, other: &AudioBuffer<S>) -> Result<()> {
        self.check_same_channels(other, "append")?;

        let total_frames = self.num_frames + other.num_frames;
        let mut samples = Vec::with_capacity(self.num_channels * total_frames);

        for channel in 0..self.num_channels {
            samples.extend_from_slice(self.channel(channel));
            samples.extend_from_slice(other.channel(channel));
        }

        self.samples = samples;
        self.num_frames = total_frames;
        Ok(())
    }

    /// Largest absolute sample value over a frame range
    ///
    /// # Arguments
    /// * `channel` - Channel to scan, or `None` for all channels
    /// * `start_frame` - First frame of the range
    /// * `num_frames` - Length of the range, must be non-zero
    pub fn peak_magnitude(
        &self,
        channel: Option<usize>,
        start_frame: usize,
        num_frames: usize,
    ) -> Result<S> {
        if num_frames == 0 {
            return Err(HarnessError::index("Peak range must cover at least one frame"));
        }

        if start_frame + num_frames > self.num_frames {
            return Err(HarnessError::index(format!(
                "Frame range {}..{} exceeds buffer length {}",
                start_frame,
                start_frame + num_frames,
                self.num_frames
            )));
        }

        let channels = match channel {
            Some(c) if c >= self.num_channels => {
                return Err(HarnessError::index(format!(
                    "Channel {} out of range for a {}-channel buffer",
                    c, self.num_channels
                )))
            }
            Some(c) => c..c + 1,
            None => 0..self.num_channels,
        };

        let peak = channels
            .flat_map(|c| self.channel(c)[start_frame..start_frame + num_frames].iter())
            .map(|s| s.abs())
            .fold(S::zero(), S::max);

        Ok(peak)
    }

    /// Largest absolute sample value in the whole buffer
    pub fn peak(&self) -> Result<S> {
        self.peak_magnitude(None, 0, self.num_frames)
    }

    /// Frame-interleaved copy of the samples
    pub fn to_interleaved(&self) -> Vec<S> {
        let mut interleaved = Vec::with_capacity(self.samples.len());

        for frame in 0..self.num_frames {
            for channel in 0..self.num_channels {
                interleaved.push(self.samples[channel * self.num_frames + frame]);
            }
        }

        interleaved
    }

    fn check_same_channels(&self, other: &AudioBuffer<S>, operation: &str) -> Result<()> {
        if self.num_channels != other.num_channels {
            return Err(HarnessError::channel_layout(format!(
                "Cannot {} a {}-channel buffer into a {}-channel buffer",
                operation, other.num_channels, self.num_channels
            )));
        }

        Ok(())
    }
}

impl<S: Sample> Index<usize> for AudioBuffer<S> {
    type Output = [S];

    fn index(&self, channel: usize) -> &[S] {
        self.channel(channel)
    }
}

impl<S: Sample> IndexMut<usize> for AudioBuffer<S> {
    fn index_mut(&mut self, channel: usize) -> &mut [S] {
        self.channel_mut(channel)
    }
}

//! Wav file reading and writing
//!
//! Thin layer over the hound crate. Buffers are written frame-interleaved;
//! integer formats are clamped to [-1, 1] and scaled to the format's
//! largest positive value before rounding.

use crate::audio::AudioBuffer;
use crate::error::{HarnessError, Result};
use crate::sample::Sample;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sample encoding of written wav files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WavFormat {
    /// 16-bit integer, scaled to ±32767
    Pcm16,
    /// 24-bit integer (3-byte little-endian), scaled to ±8388607
    #[default]
    Pcm24,
    /// 32-bit integer, scaled to ±2147483647
    Pcm32,
    /// 32-bit float, unscaled
    Float32,
}

impl WavFormat {
    /// Bits per sample in the file
    pub fn bits_per_sample(self) -> u16 {
        match self {
            WavFormat::Pcm16 => 16,
            WavFormat::Pcm24 => 24,
            WavFormat::Pcm32 | WavFormat::Float32 => 32,
        }
    }

    /// Full-scale integer value, `None` for float formats
    pub fn full_scale(self) -> Option<f64> {
        match self {
            WavFormat::Pcm16 => Some(32_767.0),
            WavFormat::Pcm24 => Some(8_388_607.0),
            WavFormat::Pcm32 => Some(2_147_483_647.0),
            WavFormat::Float32 => None,
        }
    }

    fn spec(self, num_channels: u16, sample_rate: u32) -> WavSpec {
        WavSpec {
            channels: num_channels,
            sample_rate,
            bits_per_sample: self.bits_per_sample(),
            sample_format: match self {
                WavFormat::Float32 => SampleFormat::Float,
                _ => SampleFormat::Int,
            },
        }
    }
}

/// Decoded wav file contents
#[derive(Debug, Clone)]
pub struct WavData<S: Sample> {
    pub buffer: AudioBuffer<S>,
    pub sample_rate_hz: f64,
}

/// Write a buffer to a wav file
///
/// # Arguments
/// * `buffer` - Audio to write, one file channel per buffer channel
/// * `path` - Destination file, created or truncated
/// * `sample_rate_hz` - Sample rate stored in the header (rounded to an integer)
/// * `format` - Sample encoding
pub fn write_wav<S: Sample>(
    buffer: &AudioBuffer<S>,
    path: &Path,
    sample_rate_hz: f64,
    format: WavFormat,
) -> Result<()> {
    let num_channels = u16::try_from(buffer.num_channels()).map_err(|_| {
        HarnessError::channel_layout(format!(
            "{} channels do not fit in a wav header",
            buffer.num_channels()
        ))
    })?;

    if sample_rate_hz <= 0.0 || sample_rate_hz > u32::MAX as f64 {
        return Err(HarnessError::configuration(format!(
            "Invalid wav sample rate: {}",
            sample_rate_hz
        )));
    }

    let spec = format.spec(num_channels, sample_rate_hz.round() as u32);
    let mut writer = WavWriter::create(path, spec).map_err(|e| HarnessError::wav_write(path, e))?;

    for sample in buffer.to_interleaved() {
        let value = sample.as_f64();

        let written = match format.full_scale() {
            Some(full_scale) => {
                let quantized = (value.clamp(-1.0, 1.0) * full_scale).round() as i32;
                writer.write_sample(quantized)
            }
            None => writer.write_sample(value as f32),
        };

        written.map_err(|e| HarnessError::wav_write(path, e))?;
    }

    writer
        .finalize()
        .map_err(|e| HarnessError::wav_write(path, e))?;

    info!(
        "Wrote {} frames x {} channels to {}",
        buffer.num_frames(),
        buffer.num_channels(),
        path.display()
    );
    Ok(())
}

/// Read a wav file into a buffer
///
/// Integer samples are normalised by `2^(bits - 1)`.
pub fn read_wav<S: Sample>(path: &Path) -> Result<WavData<S>> {
    let reader = WavReader::open(path).map_err(|e| HarnessError::wav_read(path, e))?;
    let spec = reader.spec();

    let interleaved: Vec<S> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| {
                s.map(|v| S::from_f64(v as f64))
                    .map_err(|e| HarnessError::wav_read(path, e))
            })
            .collect::<Result<Vec<S>>>()?,
        SampleFormat::Int => {
            let scale = (1_u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    s.map(|v| S::from_f64(v as f64 / scale))
                        .map_err(|e| HarnessError::wav_read(path, e))
                })
                .collect::<Result<Vec<S>>>()?
        }
    };

    Ok(WavData {
        buffer: AudioBuffer::from_interleaved(&interleaved, spec.channels as usize)?,
        sample_rate_hz: spec.sample_rate as f64,
    })
}

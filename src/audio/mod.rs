//! Audio data and persistence
//!
//! - [`AudioBuffer`]: fixed-channel-count sample storage
//! - [`wav`]: wav file reading and writing
//! - [`plot`]: SVG waveform plots

pub mod buffer;
pub mod plot;
pub mod wav;

pub use buffer::AudioBuffer;
pub use plot::write_plot;
pub use wav::{read_wav, write_wav, WavData, WavFormat};

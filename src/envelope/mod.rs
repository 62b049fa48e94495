//! Automation envelopes
//!
//! An [`Envelope`] produces one `f64` parameter value per frame. Envelopes
//! are attached to an effect parameter with
//! [`Effect::with_envelope`](crate::dsp::Effect::with_envelope), after which
//! the effect owns them and renders them once per processed block.

mod segmented;

pub use segmented::{SegmentedEnvelope, Shape};

use crate::error::Result;

/// Per-frame automation curve generator
pub trait Envelope: Send + std::fmt::Debug {
    /// Set the frame time step
    ///
    /// Fails if `sample_rate_hz` is not positive.
    fn prepare(&mut self, sample_rate_hz: f64, max_block_frames: usize) -> Result<()>;

    /// Rewind to time zero and the start value
    fn reset(&mut self);

    /// Advance one frame per output slot, writing the value after each step
    fn render_next_block(&mut self, values: &mut [f64]);

    /// Clone the envelope, cursor included, into a boxed trait object
    fn box_clone(&self) -> Box<dyn Envelope>;

    /// Render `num_frames` values into a fresh vector
    fn render_frames(&mut self, num_frames: usize) -> Vec<f64> {
        let mut values = vec![0.0; num_frames];
        self.render_next_block(&mut values);
        values
    }
}

impl Clone for Box<dyn Envelope> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

//! Piecewise envelope built from hold and ramp segments

use super::Envelope;
use crate::error::{HarnessError, Result};

/// Interpolation curve of a ramp segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Linear,
    /// Constant-ratio curve between begin and target value
    Exponential,
    /// Smoothstep, flat at both ends
    SCurve,
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    duration_seconds: f64,
    target_value: f64,
    shape: Shape,
    is_hold: bool,
}

/// Envelope made of consecutive hold and ramp segments
///
/// Segments are appended with [`hold`](SegmentedEnvelope::hold) and
/// [`ramp_to`](SegmentedEnvelope::ramp_to) before the envelope is attached
/// to an effect. After the last segment the envelope stays at the last
/// target value forever.
///
/// # Example
/// ```
/// use dsp_harness::envelope::{SegmentedEnvelope, Shape};
/// use dsp_harness::units::{db_to_ratio, ms};
///
/// let envelope = SegmentedEnvelope::new(db_to_ratio(-10.0))
///     .hold(ms(5.0))
///     .ramp_to(db_to_ratio(0.0), ms(25.0), Shape::SCurve)
///     .hold(ms(5.0))
///     .ramp_to(db_to_ratio(-10.0), ms(35.0), Shape::SCurve);
/// assert_eq!(envelope.num_segments(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct SegmentedEnvelope {
    start_value: f64,
    last_target: f64,
    segments: Vec<Segment>,
    frame_time_seconds: f64,

    // Cursor
    elapsed_in_segment: f64,
    segment_index: usize,
    begin_value: f64,
    current_value: f64,
}

impl SegmentedEnvelope {
    /// Create an envelope that starts (and, without segments, stays) at `start_value`
    pub fn new(start_value: f64) -> Self {
        Self {
            start_value,
            last_target: start_value,
            segments: Vec::new(),
            frame_time_seconds: 1.0 / 44_100.0,
            elapsed_in_segment: 0.0,
            segment_index: 0,
            begin_value: start_value,
            current_value: start_value,
        }
    }

    /// Append a segment that holds the last target value
    ///
    /// Negative durations are treated as zero.
    pub fn hold(mut self, duration_seconds: f64) -> Self {
        self.segments.push(Segment {
            duration_seconds: duration_seconds.max(0.0),
            target_value: self.last_target,
            shape: Shape::Linear,
            is_hold: true,
        });
        self
    }

    /// Append a ramp from the previous target to `target_value`
    ///
    /// Negative durations are treated as zero.
    pub fn ramp_to(mut self, target_value: f64, duration_seconds: f64, shape: Shape) -> Self {
        self.segments.push(Segment {
            duration_seconds: duration_seconds.max(0.0),
            target_value,
            shape,
            is_hold: false,
        });
        self.last_target = target_value;
        self
    }

    /// Number of segments
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Sum of all segment durations
    pub fn total_duration_seconds(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_seconds).sum()
    }

    /// Value after the last rendered frame
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    fn advance(&mut self, time_seconds: f64) {
        self.elapsed_in_segment += time_seconds;

        while let Some(segment) = self.segments.get(self.segment_index) {
            if self.elapsed_in_segment < segment.duration_seconds {
                self.current_value = self.value_within(segment);
                return;
            }

            self.elapsed_in_segment -= segment.duration_seconds;
            self.begin_value = segment.target_value;
            self.segment_index += 1;
        }

        // Past the last segment
        if let Some(last) = self.segments.last() {
            self.current_value = last.target_value;
        }
    }

    fn value_within(&self, segment: &Segment) -> f64 {
        if segment.is_hold {
            return segment.target_value;
        }

        let begin = self.begin_value;
        let target = segment.target_value;
        let t = self.elapsed_in_segment / segment.duration_seconds;

        match segment.shape {
            Shape::Linear => begin + (target - begin) * t,
            Shape::SCurve => begin + (target - begin) * smoothstep(t),
            Shape::Exponential => {
                let ratio = target / begin;

                // A constant-ratio curve cannot reach or cross zero
                if !ratio.is_finite() || ratio <= 0.0 {
                    return begin + (target - begin) * t;
                }

                if (ratio - 1.0).abs() < 1e-9 {
                    return begin;
                }

                if ratio > 1.0 {
                    let k = ratio.ln() / segment.duration_seconds;
                    begin * (k * self.elapsed_in_segment).exp()
                } else {
                    let k = (1.0 / ratio).ln() / segment.duration_seconds;
                    begin * (-k * self.elapsed_in_segment).exp()
                }
            }
        }
    }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

impl Envelope for SegmentedEnvelope {
    fn prepare(&mut self, sample_rate_hz: f64, _max_block_frames: usize) -> Result<()> {
        if sample_rate_hz.is_nan() || sample_rate_hz <= 0.0 {
            return Err(HarnessError::configuration(format!(
                "Illegal envelope sample rate: {}",
                sample_rate_hz
            )));
        }

        self.frame_time_seconds = 1.0 / sample_rate_hz;
        Ok(())
    }

    fn reset(&mut self) {
        self.elapsed_in_segment = 0.0;
        self.segment_index = 0;
        self.begin_value = self.start_value;
        self.current_value = self.start_value;
    }

    fn render_next_block(&mut self, values: &mut [f64]) {
        for value in values.iter_mut() {
            self.advance(self.frame_time_seconds);
            *value = self.current_value;
        }
    }

    fn box_clone(&self) -> Box<dyn Envelope> {
        Box::new(self.clone())
    }
}

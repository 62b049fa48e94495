//! Envelope regression test and the generator of its reference file

use super::{Gain, Sine, Wav};
use crate::audio::WavFormat;
use crate::dsp::params::GAIN_DB;
use crate::dsp::Effect;
use crate::envelope::{SegmentedEnvelope, Shape};
use crate::matcher::{EqualsTo, PeaksBelow};
use crate::runner::{process_audio_with, AudioTestBuilder, Save, TestContext, TestRegistry};
use crate::signal::Loop;
use crate::units::{db_to_ratio, ms};
use crate::Result;

/// Reference file of the gain envelope test, relative to the data root
pub const GAIN_ENVELOPE_WAV: &str = "gain_envelope.wav";

pub(super) fn register(registry: &mut TestRegistry) {
    registry
        .add("Gain envelope matches reference", "[envelope][regression]", matches_reference)
        .add("Gain envelope ends at its last target", "[envelope]", ends_at_target)
        .add_generator("Gain envelope reference", "[envelope][regression]", generate_reference);
}

fn envelope_run() -> Result<AudioTestBuilder<f32>> {
    let envelope = SegmentedEnvelope::new(-10.0)
        .hold(ms(5.0))
        .ramp_to(0.0, ms(25.0), Shape::SCurve)
        .hold(ms(5.0))
        .ramp_to(-10.0, ms(35.0), Shape::SCurve);

    let gain = Gain::new(0.0).with_envelope(GAIN_DB, envelope)?;

    Ok(process_audio_with(gain)
        .with_input_signal(Sine::new(1000.0)?)
        .with_sample_rate(44_100.0)?
        .with_block_size(256)?
        .with_duration(ms(75.0))?)
}

fn generate_reference(ctx: &mut TestContext<'_>) -> Result<()> {
    ctx.config().require_data_root()?;

    envelope_run()?
        .save_output_to(GAIN_ENVELOPE_WAV, Save::Always, WavFormat::Float32)
        .run(ctx)?;
    Ok(())
}

fn matches_reference(ctx: &mut TestContext<'_>) -> Result<()> {
    let reference = Wav::open_in(ctx.config(), GAIN_ENVELOPE_WAV, Loop::No)?;

    envelope_run()?
        .expect_true(EqualsTo::new(reference))
        .expect_true(PeaksBelow::new(0.0))
        .run(ctx)?;
    Ok(())
}

fn ends_at_target(ctx: &mut TestContext<'_>) -> Result<()> {
    let report = envelope_run()?.run(ctx)?;

    let ratio = db_to_ratio(-10.0);
    let input = report.input.channel(0);
    let output = report.output.channel(0);
    let start = output.len() - (ms(5.0) * 44_100.0) as usize;

    let settled = input[start..]
        .iter()
        .zip(&output[start..])
        .all(|(&i, &o)| (f64::from(o) - f64::from(i) * ratio).abs() < 1e-6);

    ctx.expect_true(settled, "gain is -10 dB after the envelope ends");
    Ok(())
}

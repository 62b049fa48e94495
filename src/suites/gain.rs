use super::{Gain, LinearGain, Sine};
use crate::matcher::{EqualsTo, PeaksAt, PeaksBelow};
use crate::runner::{process_audio_with, TestContext, TestRegistry};
use crate::signal::Silence;
use crate::units::ratio_to_db;
use crate::Result;

pub(super) fn register(registry: &mut TestRegistry) {
    registry
        .add("Unity gain leaves a sine untouched", "[gain]", unity_gain)
        .add("Gain at -inf dB mutes", "[gain]", muted)
        .add("Gain at -6 dB", "[gain]", minus_six_db)
        .add("Linear and dB gains agree", "[gain]", linear_matches_db);
}

fn unity_gain(ctx: &mut TestContext<'_>) -> Result<()> {
    process_audio_with(Gain::new(0.0))
        .with_input_signal(Sine::new(1000.0)?)
        .with_sample_rate(44_100.0)?
        .with_block_size(1024)?
        .with_duration(0.1)?
        .expect_true(EqualsTo::new(Sine::new(1000.0)?).with_tolerance(1e-6))
        .run(ctx)?;
    Ok(())
}

fn muted(ctx: &mut TestContext<'_>) -> Result<()> {
    process_audio_with(Gain::new(f64::NEG_INFINITY))
        .with_input_signal(Sine::new(1000.0)?)
        .with_duration(0.1)?
        .expect_true(EqualsTo::new(Silence::new()).with_tolerance(0.0))
        .run(ctx)?;
    Ok(())
}

fn minus_six_db(ctx: &mut TestContext<'_>) -> Result<()> {
    process_audio_with(Gain::new(-6.0))
        .in_stereo()
        .with_input_signal(Sine::new(1000.0)?)
        .expect_true(PeaksAt::new(-6.0))
        .expect_true(PeaksBelow::new(-6.0))
        .expect_false(PeaksBelow::new(-7.0))
        .run(ctx)?;
    Ok(())
}

fn linear_matches_db(ctx: &mut TestContext<'_>) -> Result<()> {
    let reference = Sine::new(440.0)? >> Gain::new(ratio_to_db(0.5));

    process_audio_with(LinearGain::new(0.5))
        .with_input_signal(Sine::new(440.0)?)
        .with_block_size(100)?
        .expect_true(EqualsTo::new(reference).with_tolerance(1e-6))
        .run(ctx)?;
    Ok(())
}

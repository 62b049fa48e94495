use super::{Clip, Gain, Sine};
use crate::matcher::{EqualsTo, PeaksAt};
use crate::runner::{process_audio_with, TestContext, TestRegistry};
use crate::Result;

pub(super) fn register(registry: &mut TestRegistry) {
    registry
        .add("Effect order changes the result", "[chain]", order_matters)
        .add("Chain peaks follow the last effect", "[chain]", chain_peaks);
}

fn gain_then_clip() -> Result<Sine> {
    Ok(Sine::new(1000.0)? >> Gain::new(1.0) >> Clip::new(-3.0))
}

fn clip_then_gain() -> Result<Sine> {
    Ok(Sine::new(1000.0)? >> Clip::new(-3.0) >> Gain::new(1.0))
}

fn order_matters(ctx: &mut TestContext<'_>) -> Result<()> {
    process_audio_with(Gain::new(0.0))
        .with_input_signal(gain_then_clip()?)
        .expect_true(EqualsTo::new(gain_then_clip()?))
        .expect_false(EqualsTo::new(clip_then_gain()?))
        .run(ctx)?;
    Ok(())
}

fn chain_peaks(ctx: &mut TestContext<'_>) -> Result<()> {
    process_audio_with(Gain::new(0.0))
        .with_input_signal(gain_then_clip()?)
        .with_label("gain >> clip")
        .expect_true(PeaksAt::new(-3.0))
        .run(ctx)?;

    process_audio_with(Gain::new(0.0))
        .with_input_signal(clip_then_gain()?)
        .with_label("clip >> gain")
        .expect_true(PeaksAt::new(-2.0))
        .run(ctx)?;
    Ok(())
}

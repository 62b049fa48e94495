use super::{Clip, Gain, Sine};
use crate::matcher::{EqualsTo, PeaksAt, PeaksBelow};
use crate::runner::{process_audio_with, TestContext, TestRegistry};
use crate::Result;

pub(super) fn register(registry: &mut TestRegistry) {
    registry
        .add("Hard clip limits a full-scale sine", "[clip]", clips_full_scale)
        .add("Hard clip passes quiet signals", "[clip]", quiet_passthrough);
}

fn clips_full_scale(ctx: &mut TestContext<'_>) -> Result<()> {
    process_audio_with(Clip::new(-3.0))
        .in_stereo()
        .with_input_signal(Sine::new(1000.0)?)
        .with_duration(0.2)?
        .expect_true(PeaksAt::new(-3.0))
        .assert_true(PeaksBelow::new(-3.0))
        .run(ctx)?;
    Ok(())
}

fn quiet_passthrough(ctx: &mut TestContext<'_>) -> Result<()> {
    process_audio_with(Clip::new(-3.0))
        .with_input_signal(Sine::new(440.0)? >> Gain::new(-12.0))
        .expect_true(EqualsTo::new(Sine::new(440.0)? >> Gain::new(-12.0)).with_tolerance(0.0))
        .run(ctx)?;
    Ok(())
}

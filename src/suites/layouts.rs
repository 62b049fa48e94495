use super::{Clip, Gain, Sine};
use crate::error::HarnessError;
use crate::matcher::PeaksAt;
use crate::runner::{process_audio_with, TestContext, TestRegistry};
use crate::units::db_to_ratio;
use crate::Result;

pub(super) fn register(registry: &mut TestRegistry) {
    registry
        .add("Mono input is copied to five outputs", "[layout][gain]", mono_to_five)
        .add("Stereo to mono gain is rejected", "[layout][gain]", stereo_to_mono_rejected)
        .add("Hard clip does not multiplex", "[layout][clip]", clip_is_n_to_n);
}

fn mono_to_five(ctx: &mut TestContext<'_>) -> Result<()> {
    let report = process_audio_with(Gain::new(-3.0))
        .with_mono_input()
        .with_output_channels(5)?
        .with_input_signal(Sine::new(1000.0)?)
        .expect_true(PeaksAt::new(-3.0))
        .run(ctx)?;

    let target = db_to_ratio(-3.0);
    for (channel, samples) in report.output.channels().enumerate() {
        let peak = samples.iter().fold(0.0_f64, |p, &s| p.max(f64::from(s).abs()));
        ctx.expect_true(
            (peak - target).abs() < PeaksAt::<f32>::DEFAULT_TOLERANCE,
            &format!("output channel {} peaks at -3 dB", channel),
        );
    }
    Ok(())
}

fn stereo_to_mono_rejected(ctx: &mut TestContext<'_>) -> Result<()> {
    let result = process_audio_with(Gain::new(0.0))
        .with_stereo_input()
        .with_mono_output()
        .with_input_signal(Sine::new(1000.0)?)
        .run(ctx);

    ctx.expect_true(
        matches!(result, Err(HarnessError::ChannelLayout { .. })),
        "2 in, 1 out fails with a channel layout error",
    );
    Ok(())
}

fn clip_is_n_to_n(ctx: &mut TestContext<'_>) -> Result<()> {
    let result = process_audio_with(Clip::new(-3.0))
        .with_mono_input()
        .with_stereo_output()
        .with_input_signal(Sine::new(1000.0)?)
        .run(ctx);

    ctx.expect_true(
        matches!(result, Err(HarnessError::ChannelLayout { .. })),
        "1 in, 2 out fails with a channel layout error",
    );
    Ok(())
}

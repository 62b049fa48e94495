use super::{Gain, Noise, Sweep};
use crate::matcher::{EqualsTo, PeaksBelow};
use crate::runner::{process_audio_with, TestContext, TestRegistry};
use crate::signal::{Loop, SweepType};
use crate::Result;

pub(super) fn register(registry: &mut TestRegistry) {
    registry
        .add("Sweeps stay within full scale", "[signal][sweep]", sweep_in_range)
        .add("Looping sweeps keep playing", "[signal][sweep]", looping_sweep)
        .add("Noise is reproducible from the seed", "[signal][noise]", noise_is_seeded);
}

fn sweep_in_range(ctx: &mut TestContext<'_>) -> Result<()> {
    let sweep = Sweep::new(0.1, 20.0, 20_000.0, SweepType::Log, Loop::No, 0.0)?;

    process_audio_with(Gain::new(-6.0))
        .with_input_signal(sweep)
        .with_duration(0.2)?
        .expect_true(PeaksBelow::new(-6.0))
        .run(ctx)?;
    Ok(())
}

fn looping_sweep(ctx: &mut TestContext<'_>) -> Result<()> {
    let sweep = Sweep::new(0.05, 100.0, 1000.0, SweepType::Linear, Loop::Yes, 0.0)?;

    let report = process_audio_with(Gain::new(0.0))
        .with_input_signal(sweep)
        .with_duration(0.2)?
        .expect_true(PeaksBelow::new(0.0))
        .run(ctx)?;

    let tail = &report.output.channel(0)[report.output.num_frames() - 441..];
    ctx.expect_true(
        tail.iter().any(|s| s.abs() > 0.5),
        "looping sweep is still audible after four sweep lengths",
    );
    Ok(())
}

fn noise_is_seeded(ctx: &mut TestContext<'_>) -> Result<()> {
    let seed = ctx.config().seed;

    process_audio_with(Gain::new(0.0))
        .in_stereo()
        .with_input_signal(Noise::new(seed))
        .with_block_size(333)?
        .expect_true(EqualsTo::new(Noise::new(seed)).with_tolerance(0.0))
        .expect_false(EqualsTo::new(Noise::new(seed.wrapping_add(1))))
        .expect_true(PeaksBelow::new(0.0))
        .run(ctx)?;
    Ok(())
}

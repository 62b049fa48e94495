use crate::common::{sine, BlockCounter, Gain, LinearGain, Noise, Sweep};
use dsp_harness::dsp::params::GAIN_LINEAR;
use dsp_harness::dsp::Effect;
use dsp_harness::envelope::{SegmentedEnvelope, Shape};
use dsp_harness::matcher::PeaksBelow;
use dsp_harness::runner::process_audio_with;
use dsp_harness::signal::{Loop, Signal, SweepType};
use dsp_harness::{AudioBuffer, HarnessConfig, HarnessError, TestContext};
use test_case::test_case;

// === Block Size Invariance ===

fn render_sweep_through_envelope(block_size: usize) -> AudioBuffer<f32> {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let envelope = SegmentedEnvelope::new(0.0)
        .ramp_to(1.0, 0.03, Shape::Exponential)
        .ramp_to(0.25, 0.04, Shape::SCurve);
    let gain = LinearGain::new(1.0)
        .with_envelope(GAIN_LINEAR, envelope)
        .unwrap();
    let sweep = Sweep::new(0.05, 50.0, 5000.0, SweepType::Log, Loop::Yes, 0.0).unwrap();

    process_audio_with(gain)
        .in_stereo()
        .with_input_signal(sweep >> Gain::new(-1.0))
        .with_block_size(block_size)
        .unwrap()
        .with_duration(0.1)
        .unwrap()
        .run(&mut ctx)
        .unwrap()
        .output
}

#[test_case(1; "single frames")]
#[test_case(64; "power of two")]
#[test_case(1000; "not dividing the duration")]
#[test_case(4410; "one block")]
#[test_case(10_000; "larger than the duration")]
fn test_block_size_invariance(block_size: usize) {
    let reference = render_sweep_through_envelope(512);
    let output = render_sweep_through_envelope(block_size);

    assert_eq!(output.num_frames(), 4410);
    assert_eq!(output, reference);
}

#[test]
fn test_last_block_is_truncated() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(0.0))
        .with_input_signal(sine(100.0))
        .with_block_size(1000)
        .unwrap()
        .run(&mut ctx)
        .unwrap();

    assert_eq!(report.num_blocks, 5);
    assert_eq!(report.output.num_frames(), 4410);
}

// === Reset Idempotence ===

#[test]
fn test_signal_reset_replays_from_start() {
    let mut noise = Noise::new(3) >> Gain::new(-6.0);
    noise.prepare_with_chain(48_000.0, 2, 256).unwrap();

    let mut fresh = AudioBuffer::<f32>::new(2, 256);
    noise.render_next_block_with_chain(&mut fresh).unwrap();

    let mut scratch = AudioBuffer::<f32>::new(2, 256);
    for _ in 0..3 {
        noise.render_next_block_with_chain(&mut scratch).unwrap();
    }

    noise.reset_with_chain();
    let mut replayed = AudioBuffer::<f32>::new(2, 256);
    noise.render_next_block_with_chain(&mut replayed).unwrap();

    assert_eq!(replayed, fresh);
}

#[test]
fn test_effect_reset_replays_envelope() {
    let envelope = SegmentedEnvelope::new(0.0).ramp_to(1.0, 0.01, Shape::Linear);
    let mut gain = LinearGain::new(1.0)
        .with_envelope(GAIN_LINEAR, envelope)
        .unwrap();
    gain.prepare_with_automation(1000.0, 1, 1, 8).unwrap();

    let input = AudioBuffer::from_channels(vec![vec![1.0_f32; 8]]).unwrap();
    let mut fresh = AudioBuffer::new(1, 8);
    gain.process_with_automation(&input, &mut fresh).unwrap();

    let mut scratch = AudioBuffer::new(1, 8);
    gain.process_with_automation(&input, &mut scratch).unwrap();

    gain.reset();
    gain.reset_automation();
    let mut replayed = AudioBuffer::new(1, 8);
    gain.process_with_automation(&input, &mut replayed).unwrap();

    assert_eq!(replayed, fresh);
}

// === Multiplexing ===

#[test_case(2; "stereo")]
#[test_case(5; "five channels")]
#[test_case(16; "sixteen channels")]
fn test_multiplexed_channels_are_identical(num_outputs: usize) {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(-4.5))
        .with_mono_input()
        .with_output_channels(num_outputs)
        .unwrap()
        .with_input_signal(Noise::new(11))
        .run(&mut ctx)
        .unwrap();

    for channel in 1..num_outputs {
        assert_eq!(report.output.channel(channel), report.output.channel(0));
    }
}

// === Assertion Severity ===

#[test]
fn test_assert_failure_stops_before_next_block() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let counter = BlockCounter::default();
    let blocks = counter.blocks.clone();

    let result = process_audio_with(counter)
        .with_input_signal(sine(1000.0))
        .with_block_size(441)
        .unwrap()
        .assert_true(PeaksBelow::new(-20.0))
        .run(&mut ctx);

    match result {
        Err(HarnessError::AssertionFailed { message }) => {
            assert!(message.starts_with("assert_true() failed\nCondition: PeaksBelow (-20.00 dB)"));
            assert!(message.contains("\nFrame: "));
        }
        other => panic!("expected an assertion failure, got {:?}", other.map(|r| r.failed)),
    }
    assert_eq!(blocks.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(ctx.failures().is_empty());
}

#[test]
fn test_expect_failure_keeps_running() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let counter = BlockCounter::default();
    let observer = counter.clone();

    let report = process_audio_with(counter)
        .with_input_signal(sine(1000.0))
        .with_block_size(441)
        .unwrap()
        .expect_true(PeaksBelow::new(-20.0))
        .run(&mut ctx)
        .unwrap();

    assert!(report.failed);
    assert_eq!(observer.count(), 10);
    assert_eq!(report.output.num_frames(), 4410);

    // Recorded once, then skipped for the rest of the run
    assert_eq!(ctx.failures().len(), 1);
    assert!(matches!(
        ctx.into_result(),
        Err(HarnessError::ExpectationsFailed { messages }) if messages.len() == 1
    ));
}

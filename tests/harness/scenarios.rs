use crate::common::{channel_peak, sine, Clip, Gain};
use approx::assert_abs_diff_eq;
use dsp_harness::dsp::params::GAIN_DB;
use dsp_harness::dsp::Effect;
use dsp_harness::envelope::{SegmentedEnvelope, Shape};
use dsp_harness::matcher::{EqualsTo, PeaksAt, PeaksBelow};
use dsp_harness::runner::process_audio_with;
use dsp_harness::signal::Silence;
use dsp_harness::units::{db_to_ratio, ms, ratio_to_db};
use dsp_harness::{HarnessConfig, TestContext};

// === Gain ===

#[test]
fn test_unity_gain_equals_input() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(0.0))
        .with_input_signal(sine(1000.0))
        .with_sample_rate(44_100.0)
        .unwrap()
        .with_block_size(1024)
        .unwrap()
        .with_duration(0.1)
        .unwrap()
        .expect_true(EqualsTo::new(sine(1000.0)).with_tolerance(1e-6))
        .run(&mut ctx)
        .unwrap();

    assert!(!report.failed);
    assert!(ctx.failures().is_empty());
    assert_eq!(report.output.num_frames(), 4410);
    assert_eq!(report.output, report.input);
}

#[test]
fn test_negative_infinity_gain_is_silent() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(f64::NEG_INFINITY))
        .with_input_signal(sine(1000.0))
        .expect_true(EqualsTo::new(Silence::new()).with_tolerance(0.0))
        .run(&mut ctx)
        .unwrap();

    assert!(!report.failed);
    assert!(report.output.channel(0).iter().all(|&s| s == 0.0));
}

// === Hard Clip ===

#[test]
fn test_hard_clip_peaks_at_threshold() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Clip::new(-3.0))
        .with_input_signal(sine(1000.0))
        .expect_true(PeaksAt::new(-3.0))
        .expect_true(PeaksBelow::new(-3.0))
        .run(&mut ctx)
        .unwrap();

    assert!(!report.failed);
    assert_abs_diff_eq!(ratio_to_db(channel_peak(&report.output, 0)), -3.0, epsilon = 0.01);
    assert!(report
        .output
        .channel(0)
        .iter()
        .all(|&s| f64::from(s.abs()) <= db_to_ratio(-3.0) + 1e-7));
}

// === Envelope Regression ===

fn enveloped_gain() -> Gain {
    let envelope = SegmentedEnvelope::new(-10.0)
        .hold(ms(5.0))
        .ramp_to(0.0, ms(25.0), Shape::SCurve)
        .hold(ms(5.0))
        .ramp_to(-10.0, ms(35.0), Shape::SCurve);

    Gain::new(0.0).with_envelope(GAIN_DB, envelope).unwrap()
}

#[test]
fn test_envelope_render_is_deterministic() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let mut run = process_audio_with(enveloped_gain())
        .with_input_signal(sine(1000.0))
        .with_duration(ms(75.0))
        .unwrap();

    let first = run.run(&mut ctx).unwrap();
    let second = run.run(&mut ctx).unwrap();
    let fresh = process_audio_with(enveloped_gain())
        .with_input_signal(sine(1000.0))
        .with_duration(ms(75.0))
        .unwrap()
        .run(&mut ctx)
        .unwrap();

    assert_eq!(first.output, second.output);
    assert_eq!(first.output, fresh.output);
}

#[test]
fn test_envelope_shapes_the_gain() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(enveloped_gain())
        .with_input_signal(sine(1000.0))
        .with_duration(ms(75.0))
        .unwrap()
        .run(&mut ctx)
        .unwrap();

    // Fully open between 30 and 35 ms
    let open = (ms(30.5) * 44_100.0) as usize..(ms(34.5) * 44_100.0) as usize;
    for frame in open {
        assert_abs_diff_eq!(report.output[0][frame], report.input[0][frame], epsilon = 1e-6);
    }

    // First hold at -10 dB
    let ratio = db_to_ratio(-10.0) as f32;
    for frame in 0..(ms(4.5) * 44_100.0) as usize {
        assert_abs_diff_eq!(report.output[0][frame], report.input[0][frame] * ratio, epsilon = 1e-6);
    }
}

// === Chain Order ===

#[test]
fn test_effect_order_changes_output() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(0.0))
        .with_input_signal(sine(1000.0) >> Gain::new(1.0) >> Clip::new(-3.0))
        .expect_false(EqualsTo::new(sine(1000.0) >> Clip::new(-3.0) >> Gain::new(1.0)))
        .expect_true(EqualsTo::new(sine(1000.0) >> Gain::new(1.0) >> Clip::new(-3.0)))
        .run(&mut ctx)
        .unwrap();

    assert!(!report.failed, "{:?}", ctx.failures());
}

#[test]
fn test_equal_chains_fail_negated_check() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(0.0))
        .with_input_signal(sine(1000.0) >> Gain::new(1.0) >> Clip::new(-3.0))
        .expect_false(EqualsTo::new(sine(1000.0) >> Gain::new(1.0) >> Clip::new(-3.0)))
        .run(&mut ctx)
        .unwrap();

    assert!(report.failed);
    assert_eq!(ctx.failures().len(), 1);
    assert!(ctx.failures()[0].starts_with("expect_false() failed"));
}

// === Channel Layouts ===

#[test]
fn test_mono_to_five_channels_peaks_at_minus_three_db() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(-3.0))
        .with_input_channels(1)
        .unwrap()
        .with_output_channels(5)
        .unwrap()
        .with_input_signal(sine(1000.0))
        .expect_true(PeaksAt::new(-3.0))
        .run(&mut ctx)
        .unwrap();

    assert!(!report.failed);
    assert_eq!(report.output.num_channels(), 5);
    for channel in 0..5 {
        assert_abs_diff_eq!(channel_peak(&report.output, channel), db_to_ratio(-3.0), epsilon = 1e-3);
        assert_eq!(report.output.channel(channel), report.output.channel(0));
    }
}

#[test]
fn test_negated_check_with_automated_reference() {
    let config = HarnessConfig::default();
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(0.0))
        .with_input_signal(sine(1000.0))
        .with_block_size(128)
        .unwrap()
        .with_duration(ms(75.0))
        .unwrap()
        .expect_false(EqualsTo::new(sine(1000.0) >> enveloped_gain()))
        .run(&mut ctx)
        .unwrap();

    assert!(!report.failed, "{:?}", ctx.failures());
}

use crate::common::{sine, Clip, Gain};
use dsp_harness::audio::{read_wav, WavFormat};
use dsp_harness::matcher::{PeaksAt, PeaksBelow};
use dsp_harness::runner::{process_audio_with, AudioTestBuilder, Save};
use dsp_harness::{HarnessConfig, TestContext};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use test_case::test_case;

fn config_in(root: PathBuf) -> HarnessConfig {
    HarnessConfig {
        data_root: root,
        ..HarnessConfig::default()
    }
}

fn clipping_run(passing: bool) -> AudioTestBuilder<f32> {
    let threshold_db = if passing { -3.0 } else { -6.0 };

    process_audio_with(Clip::new(-3.0))
        .in_stereo()
        .with_input_signal(sine(500.0))
        .expect_true(PeaksBelow::new(threshold_db))
}

#[test_case(Save::Always, true, true; "always, passing")]
#[test_case(Save::Always, false, true; "always, failing")]
#[test_case(Save::WhenFails, true, false; "when fails, passing")]
#[test_case(Save::WhenFails, false, true; "when fails, failing")]
#[test_case(Save::Never, true, false; "never, passing")]
#[test_case(Save::Never, false, false; "never, failing")]
fn test_save_modes(mode: Save, passing: bool, written: bool) {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path().to_path_buf());
    let mut ctx = TestContext::new(&config);

    clipping_run(passing)
        .save_output_to("out.wav", mode, WavFormat::Pcm24)
        .save_plot_to("out.svg", mode)
        .run(&mut ctx)
        .unwrap();

    assert_eq!(dir.path().join("out.wav").exists(), written);
    assert_eq!(dir.path().join("out.svg").exists(), written);
    assert_eq!(ctx.has_failures(), !passing);
}

#[test]
fn test_saved_output_matches_run() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path().to_path_buf());
    let mut ctx = TestContext::new(&config);

    let report = process_audio_with(Gain::new(-6.0))
        .with_mono_input()
        .with_stereo_output()
        .with_sample_rate(48_000.0)
        .unwrap()
        .with_input_signal(sine(1000.0))
        .save_output_to("gain.wav", Save::Always, WavFormat::Float32)
        .run(&mut ctx)
        .unwrap();

    let saved = read_wav::<f32>(&dir.path().join("gain.wav")).unwrap();
    assert_eq!(saved.sample_rate_hz, 48_000.0);
    assert_eq!(saved.buffer, report.output);
}

#[test]
fn test_plot_has_both_panels() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path().to_path_buf());
    let mut ctx = TestContext::new(&config);

    process_audio_with(Gain::new(-3.0))
        .with_mono_input()
        .with_output_channels(3)
        .unwrap()
        .with_input_signal(sine(250.0))
        .save_plot_to("plot.svg", Save::Always)
        .run(&mut ctx)
        .unwrap();

    let svg = fs::read_to_string(dir.path().join("plot.svg")).unwrap();
    assert!(svg.contains(">Input<"));
    assert!(svg.contains(">Output<"));
    assert_eq!(svg.matches("<polyline").count(), 4);
}

#[test]
fn test_assert_failure_saves_nothing() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path().to_path_buf());
    let mut ctx = TestContext::new(&config);

    let result = process_audio_with(Gain::new(0.0))
        .with_input_signal(sine(1000.0))
        .assert_true(PeaksAt::new(-20.0))
        .save_output_to("never.wav", Save::Always, WavFormat::Pcm16)
        .run(&mut ctx);

    assert!(result.is_err());
    assert!(!dir.path().join("never.wav").exists());
}

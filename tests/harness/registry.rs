use dsp_harness::runner::CaseKind;
use dsp_harness::suites::{builtin_registry, GAIN_ENVELOPE_WAV};
use dsp_harness::{HarnessConfig, HarnessError, Result, TestContext, TestRegistry};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn passing(ctx: &mut TestContext<'_>) -> Result<()> {
    ctx.expect_true(true, "always");
    Ok(())
}

fn failing(_: &mut TestContext<'_>) -> Result<()> {
    Err(HarnessError::AssertionFailed {
        message: "assert_true() failed\nCondition: never".to_string(),
    })
}

#[test]
fn test_exit_code_follows_failures() {
    let config = HarnessConfig::default();

    let mut registry = TestRegistry::new();
    registry.add("passing", "[a]", passing);
    let mut out = Vec::new();
    assert_eq!(registry.run_all_with_output(&config, &mut out).unwrap().exit_code(), 0);

    registry.add("failing", "[b]", failing);
    let mut out = Vec::new();
    let summary = registry.run_all_with_output(&config, &mut out).unwrap();
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(summary.failed, 1);

    let only_a = HarnessConfig {
        tags: vec!["a".to_string()],
        ..HarnessConfig::default()
    };
    let mut out = Vec::new();
    assert_eq!(registry.run_all_with_output(&only_a, &mut out).unwrap().exit_code(), 0);
}

#[test]
fn test_builtin_suites_pass_after_generating_references() {
    let dir = tempdir().unwrap();

    let generate = HarnessConfig {
        data_root: dir.path().to_path_buf(),
        run_generators: true,
        ..HarnessConfig::default()
    };
    let registry = builtin_registry();

    let mut out = Vec::new();
    let generated = registry.run_all_with_output(&generate, &mut out).unwrap();
    assert_eq!(generated.failed, 0, "{}", String::from_utf8_lossy(&out));
    assert!(dir.path().join(GAIN_ENVELOPE_WAV).exists());

    let test = HarnessConfig {
        run_generators: false,
        seed: 1234,
        shuffle: true,
        ..generate
    };
    let mut out = Vec::new();
    let summary = registry.run_all_with_output(&test, &mut out).unwrap();

    assert_eq!(summary.failed, 0, "{}", String::from_utf8_lossy(&out));
    assert_eq!(
        summary.total(),
        registry
            .cases()
            .iter()
            .filter(|c| c.kind == CaseKind::Test)
            .count()
    );
}

#[test]
fn test_regression_fails_without_reference() {
    let dir = tempdir().unwrap();
    let config = HarnessConfig {
        data_root: dir.path().to_path_buf(),
        tags: vec!["regression".to_string()],
        ..HarnessConfig::default()
    };

    let mut out = Vec::new();
    let summary = builtin_registry().run_all_with_output(&config, &mut out).unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(summary.exit_code(), 1);
    assert!(summary.cases[0].messages[0].contains(GAIN_ENVELOPE_WAV));
}

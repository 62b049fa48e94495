//! Test runs: one effect, one input signal, a set of checks
//!
//! ```no_run
//! use dsp_harness::config::HarnessConfig;
//! use dsp_harness::dsp::GainDb;
//! use dsp_harness::matcher::PeaksAt;
//! use dsp_harness::runner::{process_audio_with, TestContext};
//! use dsp_harness::signal::SineWave;
//!
//! # fn main() -> dsp_harness::Result<()> {
//! let config = HarnessConfig::default();
//! let mut ctx = TestContext::new(&config);
//!
//! process_audio_with(GainDb::<f32>::new(-6.0))
//!     .with_input_signal(SineWave::new(1000.0)?)
//!     .with_duration(0.1)?
//!     .expect_true(PeaksAt::new(-6.0))
//!     .run(&mut ctx)?;
//!
//! ctx.into_result()
//! # }
//! ```

use super::check::{AssertionLevel, Check, CheckScope};
use super::context::TestContext;
use super::report::{failure_message, Position};
use crate::audio::{write_plot, write_wav, AudioBuffer, WavFormat};
use crate::config::HarnessConfig;
use crate::dsp::{Effect, ParamId};
use crate::error::{HarnessError, Result};
use crate::matcher::Matcher;
use crate::sample::Sample;
use crate::signal::Signal;
use log::{debug, warn};
use std::path::PathBuf;

/// Upper bound for input and output channel counts
pub const MAX_CHANNELS: usize = 128;

/// When to write a run's output to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Save {
    Always,
    /// Only if at least one check failed during the run
    WhenFails,
    #[default]
    Never,
}

impl Save {
    fn applies(self, failed: bool) -> bool {
        match self {
            Save::Always => true,
            Save::WhenFails => failed,
            Save::Never => false,
        }
    }
}

#[derive(Debug, Clone)]
struct OutputTarget {
    path: PathBuf,
    mode: Save,
    format: WavFormat,
}

#[derive(Debug, Clone)]
struct PlotTarget {
    path: PathBuf,
    mode: Save,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunReport<S: Sample> {
    /// Everything the input signal rendered, chain included
    pub input: AudioBuffer<S>,
    /// Everything the effect produced
    pub output: AudioBuffer<S>,
    /// Whether any expect-level check failed
    pub failed: bool,
    pub num_blocks: usize,
}

/// Start a test run for `effect`
pub fn process_audio_with<S, E>(effect: E) -> AudioTestBuilder<S>
where
    S: Sample,
    E: Effect<S> + 'static,
{
    AudioTestBuilder::new(Box::new(effect))
}

/// Configures and runs one effect under test
///
/// Defaults: 44.1 kHz, blocks of 1024 frames, mono in and out, 0.1 s.
pub struct AudioTestBuilder<S: Sample> {
    effect: Box<dyn Effect<S>>,
    input_signal: Option<Box<dyn Signal<S>>>,
    sample_rate_hz: f64,
    block_size_frames: usize,
    num_input_channels: usize,
    num_output_channels: usize,
    duration_seconds: f64,
    param_values: Vec<(ParamId, f64)>,
    checks: Vec<Check<S>>,
    label: String,
    save_output: Option<OutputTarget>,
    save_plot: Option<PlotTarget>,
}

impl<S: Sample> AudioTestBuilder<S> {
    pub fn new(effect: Box<dyn Effect<S>>) -> Self {
        Self {
            effect,
            input_signal: None,
            sample_rate_hz: 44_100.0,
            block_size_frames: 1024,
            num_input_channels: 1,
            num_output_channels: 1,
            duration_seconds: 0.1,
            param_values: Vec::new(),
            checks: Vec::new(),
            label: String::new(),
            save_output: None,
            save_plot: None,
        }
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// Set the sample rate; must be positive and supported by the effect
    pub fn with_sample_rate(mut self, sample_rate_hz: f64) -> Result<Self> {
        if sample_rate_hz.is_nan() || sample_rate_hz <= 0.0 {
            return Err(HarnessError::configuration(format!(
                "Sample rate should be a positive value in Hz, got {}",
                sample_rate_hz
            )));
        }

        if !self.effect.supports_sample_rate(sample_rate_hz) {
            return Err(HarnessError::unsupported(format!(
                "Sample rate of {} Hz is not supported by the tested effect",
                sample_rate_hz
            )));
        }

        self.sample_rate_hz = sample_rate_hz;
        Ok(self)
    }

    pub fn with_block_size(mut self, block_size_frames: usize) -> Result<Self> {
        if block_size_frames == 0 {
            return Err(HarnessError::size(
                "Block size should be a positive number of frames",
            ));
        }

        self.block_size_frames = block_size_frames;
        Ok(self)
    }

    /// Set how much audio to process, in seconds
    pub fn with_duration(mut self, duration_seconds: f64) -> Result<Self> {
        if duration_seconds.is_nan() || duration_seconds < 0.0 {
            return Err(HarnessError::configuration(format!(
                "Duration should be a non-negative value in seconds, got {}",
                duration_seconds
            )));
        }

        self.duration_seconds = duration_seconds;
        Ok(self)
    }

    pub fn with_input_channels(mut self, num_channels: usize) -> Result<Self> {
        self.num_input_channels = validate_channels(num_channels)?;
        Ok(self)
    }

    pub fn with_output_channels(mut self, num_channels: usize) -> Result<Self> {
        self.num_output_channels = validate_channels(num_channels)?;
        Ok(self)
    }

    /// Mono input and output
    pub fn in_mono(mut self) -> Self {
        self.num_input_channels = 1;
        self.num_output_channels = 1;
        self
    }

    /// Stereo input and output
    pub fn in_stereo(mut self) -> Self {
        self.num_input_channels = 2;
        self.num_output_channels = 2;
        self
    }

    pub fn with_mono_input(mut self) -> Self {
        self.num_input_channels = 1;
        self
    }

    pub fn with_stereo_input(mut self) -> Self {
        self.num_input_channels = 2;
        self
    }

    pub fn with_mono_output(mut self) -> Self {
        self.num_output_channels = 1;
        self
    }

    pub fn with_stereo_output(mut self) -> Self {
        self.num_output_channels = 2;
        self
    }

    /// Queue a fixed parameter value, applied after the effect is prepared
    ///
    /// Ignored for parameters that have an envelope attached.
    pub fn with_value(mut self, id: ParamId, value: f64) -> Self {
        self.param_values.push((id, value));
        self
    }

    pub fn with_input_signal(self, signal: impl Signal<S> + 'static) -> Self {
        self.with_boxed_input_signal(Box::new(signal))
    }

    pub fn with_boxed_input_signal(mut self, signal: Box<dyn Signal<S>>) -> Self {
        self.input_signal = Some(signal);
        self
    }

    /// Label shown in failure messages
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    // ------------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------------

    /// Record a failure and continue if the output does not match
    pub fn expect_true(self, matcher: impl Matcher<S> + 'static) -> Self {
        self.with_check(Box::new(matcher), AssertionLevel::Expect, true)
    }

    /// Record a failure and continue if the output matches
    pub fn expect_false(self, matcher: impl Matcher<S> + 'static) -> Self {
        self.with_check(Box::new(matcher), AssertionLevel::Expect, false)
    }

    /// Abort the run if the output does not match
    pub fn assert_true(self, matcher: impl Matcher<S> + 'static) -> Self {
        self.with_check(Box::new(matcher), AssertionLevel::Assert, true)
    }

    /// Abort the run if the output matches
    pub fn assert_false(self, matcher: impl Matcher<S> + 'static) -> Self {
        self.with_check(Box::new(matcher), AssertionLevel::Assert, false)
    }

    pub fn with_check(
        mut self,
        matcher: Box<dyn Matcher<S>>,
        level: AssertionLevel,
        should_pass: bool,
    ) -> Self {
        self.checks.push(Check::new(matcher, level, should_pass));
        self
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Write the output to a wav file after the run
    ///
    /// Relative paths are resolved against the data root.
    pub fn save_output_to(mut self, path: impl Into<PathBuf>, mode: Save, format: WavFormat) -> Self {
        self.save_output = Some(OutputTarget {
            path: path.into(),
            mode,
            format,
        });
        self
    }

    /// Write an SVG plot of input and output after the run
    ///
    /// Relative paths are resolved against the data root.
    pub fn save_plot_to(mut self, path: impl Into<PathBuf>, mode: Save) -> Self {
        self.save_plot = Some(PlotTarget {
            path: path.into(),
            mode,
        });
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn effect(&self) -> &dyn Effect<S> {
        self.effect.as_ref()
    }

    pub fn checks(&self) -> &[Check<S>] {
        &self.checks
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn block_size_frames(&self) -> usize {
        self.block_size_frames
    }

    pub fn num_input_channels(&self) -> usize {
        self.num_input_channels
    }

    pub fn num_output_channels(&self) -> usize {
        self.num_output_channels
    }

    /// Hand back the effect without running
    pub fn into_effect(self) -> Box<dyn Effect<S>> {
        self.effect
    }

    // ------------------------------------------------------------------------
    // Running
    // ------------------------------------------------------------------------

    /// Run and hand the effect back
    pub fn process(mut self, ctx: &mut TestContext<'_>) -> Result<Box<dyn Effect<S>>> {
        self.run(ctx)?;
        Ok(self.effect)
    }

    /// Render the input signal through the effect and evaluate every check
    ///
    /// Expect-level failures are recorded in `ctx`; the first assert-level
    /// failure aborts the run with [`HarnessError::AssertionFailed`] before
    /// any further block is processed and before anything is saved. The
    /// builder can be run again; every run starts from a fresh state.
    pub fn run(&mut self, ctx: &mut TestContext<'_>) -> Result<RunReport<S>> {
        let duration_frames = (self.sample_rate_hz * self.duration_seconds).round() as usize;
        if duration_frames == 0 {
            return Err(HarnessError::size("Nothing to process, duration is zero frames"));
        }

        let signal = self.input_signal.as_mut().ok_or_else(|| {
            HarnessError::configuration("No input signal, call with_input_signal() first")
        })?;

        for check in &mut self.checks {
            // Full-signal checks see the whole output in one call
            let max_block_frames = match check.scope() {
                CheckScope::PerBlock => self.block_size_frames,
                CheckScope::FullSignal => duration_frames,
            };
            check.prepare(self.sample_rate_hz, self.num_output_channels, max_block_frames)?;
        }

        self.effect.reset();
        self.effect.prepare_with_automation(
            self.sample_rate_hz,
            self.num_input_channels,
            self.num_output_channels,
            self.block_size_frames,
        )?;

        for &(id, value) in &self.param_values {
            if self.effect.has_envelope_for(id) {
                warn!("Parameter {} has an envelope, ignoring fixed value {}", id, value);
                continue;
            }

            self.effect.set_value(id, value);
        }

        signal.reset_with_chain();
        signal.prepare_with_chain(
            self.sample_rate_hz,
            self.num_input_channels,
            self.block_size_frames,
        )?;

        debug!(
            "Running {} frames in blocks of {} ({} in, {} out, {} Hz)",
            duration_frames,
            self.block_size_frames,
            self.num_input_channels,
            self.num_output_channels,
            self.sample_rate_hz
        );

        let mut full_input = AudioBuffer::new(self.num_input_channels, 0);
        let mut full_output = AudioBuffer::new(self.num_output_channels, 0);
        let mut failed = false;
        let mut offset_frames = 0;
        let mut num_blocks = 0;

        while offset_frames < duration_frames {
            let block_frames = self.block_size_frames.min(duration_frames - offset_frames);
            let mut input_block = AudioBuffer::new(self.num_input_channels, block_frames);
            let mut output_block = AudioBuffer::new(self.num_output_channels, block_frames);

            signal.render_next_block_with_chain(&mut input_block)?;
            self.effect
                .process_with_automation(&input_block, &mut output_block)?;

            let position = Position {
                label: &self.label,
                offset_frames,
                sample_rate_hz: self.sample_rate_hz,
            };
            failed |= evaluate_checks(
                &mut self.checks,
                CheckScope::PerBlock,
                &output_block,
                position,
                ctx,
            )?;

            full_input.append_from(&input_block)?;
            full_output.append_from(&output_block)?;
            offset_frames += block_frames;
            num_blocks += 1;
        }

        let position = Position {
            label: &self.label,
            offset_frames: 0,
            sample_rate_hz: self.sample_rate_hz,
        };
        failed |= evaluate_checks(
            &mut self.checks,
            CheckScope::FullSignal,
            &full_output,
            position,
            ctx,
        )?;

        debug!(
            "Processed {} blocks, {}",
            num_blocks,
            if failed { "with failures" } else { "all checks passed" }
        );

        self.persist(&full_input, &full_output, failed, ctx.config())?;

        Ok(RunReport {
            input: full_input,
            output: full_output,
            failed,
            num_blocks,
        })
    }

    fn persist(
        &self,
        input: &AudioBuffer<S>,
        output: &AudioBuffer<S>,
        failed: bool,
        config: &HarnessConfig,
    ) -> Result<()> {
        if let Some(target) = &self.save_output {
            if target.mode.applies(failed) {
                write_wav(
                    output,
                    &config.resolve_path(&target.path),
                    self.sample_rate_hz,
                    target.format,
                )?;
            }
        }

        if let Some(target) = &self.save_plot {
            if target.mode.applies(failed) {
                write_plot(
                    input,
                    output,
                    self.sample_rate_hz,
                    &config.resolve_path(&target.path),
                )?;
            }
        }

        Ok(())
    }
}

fn validate_channels(num_channels: usize) -> Result<usize> {
    if num_channels == 0 || num_channels > MAX_CHANNELS {
        return Err(HarnessError::configuration(format!(
            "Channel count should be between 1 and {}, got {}",
            MAX_CHANNELS, num_channels
        )));
    }

    Ok(num_channels)
}

/// Evaluate every check of `scope`; returns whether any of them failed
fn evaluate_checks<S: Sample>(
    checks: &mut [Check<S>],
    scope: CheckScope,
    observed: &AudioBuffer<S>,
    position: Position<'_>,
    ctx: &mut TestContext<'_>,
) -> Result<bool> {
    let precision = ctx.config().precision;
    let mut any_failed = false;

    for check in checks.iter_mut().filter(|c| c.scope() == scope) {
        if check.evaluate(observed)? {
            continue;
        }

        any_failed = true;
        let message = failure_message(check, observed, position, &precision);

        match check.level() {
            AssertionLevel::Assert => return Err(HarnessError::AssertionFailed { message }),
            AssertionLevel::Expect => {
                warn!("{}", message);
                ctx.record_failure(message);
            }
        }
    }

    Ok(any_failed)
}

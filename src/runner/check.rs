//! Checks registered on a test run

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::sample::Sample;

/// What happens when a check fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionLevel {
    /// Record the failure and keep running
    Expect,
    /// Abort the run immediately
    Assert,
}

/// Where a check is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckScope {
    /// On every block, right after it is processed
    PerBlock,
    /// Once, on the accumulated output
    FullSignal,
}

/// A matcher together with its expected outcome and severity
#[derive(Clone)]
pub struct Check<S: Sample> {
    matcher: Box<dyn Matcher<S>>,
    level: AssertionLevel,
    should_pass: bool,
    should_skip: bool,
    scope: CheckScope,
}

impl<S: Sample> Check<S> {
    /// Create a check, fixing its scope
    ///
    /// A check runs per block only if the matcher supports it and the
    /// check expects a match. A negated check must see the whole signal:
    /// "no block matched" does not imply "the signal does not match".
    pub fn new(matcher: Box<dyn Matcher<S>>, level: AssertionLevel, should_pass: bool) -> Self {
        let scope = if should_pass && matcher.can_operate_per_block() {
            CheckScope::PerBlock
        } else {
            CheckScope::FullSignal
        };

        Self {
            matcher,
            level,
            should_pass,
            should_skip: false,
            scope,
        }
    }

    pub fn matcher(&self) -> &dyn Matcher<S> {
        self.matcher.as_ref()
    }

    pub fn level(&self) -> AssertionLevel {
        self.level
    }

    pub fn should_pass(&self) -> bool {
        self.should_pass
    }

    pub fn scope(&self) -> CheckScope {
        self.scope
    }

    /// Check if the check has already failed during the current run
    pub fn is_skipped(&self) -> bool {
        self.should_skip
    }

    /// Name of the builder call that registered the check
    pub fn call_name(&self) -> &'static str {
        match (self.level, self.should_pass) {
            (AssertionLevel::Expect, true) => "expect_true()",
            (AssertionLevel::Expect, false) => "expect_false()",
            (AssertionLevel::Assert, true) => "assert_true()",
            (AssertionLevel::Assert, false) => "assert_false()",
        }
    }

    /// Prepare and reset the matcher, and re-arm the check, for a new run
    pub fn prepare(
        &mut self,
        sample_rate_hz: f64,
        num_channels: usize,
        max_block_frames: usize,
    ) -> Result<()> {
        self.matcher
            .prepare(sample_rate_hz, num_channels, max_block_frames)?;
        self.matcher.reset();
        self.should_skip = false;
        Ok(())
    }

    /// Evaluate against `observed`
    ///
    /// Returns `false` the first time the outcome deviates from the
    /// expected one; from then on the check is skipped and returns `true`
    /// until the next [`prepare`](Check::prepare).
    pub fn evaluate(&mut self, observed: &AudioBuffer<S>) -> Result<bool> {
        if self.should_skip {
            return Ok(true);
        }

        let matched = self.matcher.matches(observed)?;
        if matched == self.should_pass {
            return Ok(true);
        }

        self.should_skip = true;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{PeaksAt, PeaksBelow};

    fn check(matcher: impl Matcher<f32> + 'static, should_pass: bool) -> Check<f32> {
        Check::new(Box::new(matcher), AssertionLevel::Expect, should_pass)
    }

    #[test]
    fn test_scope_routing() {
        assert_eq!(check(PeaksBelow::new(0.0), true).scope(), CheckScope::PerBlock);
        assert_eq!(check(PeaksBelow::new(0.0), false).scope(), CheckScope::FullSignal);
        assert_eq!(check(PeaksAt::new(0.0), true).scope(), CheckScope::FullSignal);
        assert_eq!(check(PeaksAt::new(0.0), false).scope(), CheckScope::FullSignal);
    }

    #[test]
    fn test_fails_once_then_skips() {
        let mut check = check(PeaksBelow::new(-6.0), true);
        check.prepare(44_100.0, 1, 4).unwrap();

        let loud = AudioBuffer::from_channels(vec![vec![1.0_f32; 4]]).unwrap();
        assert!(!check.evaluate(&loud).unwrap());
        assert!(check.is_skipped());
        assert!(check.evaluate(&loud).unwrap());

        check.prepare(44_100.0, 1, 4).unwrap();
        assert!(!check.is_skipped());
    }

    #[test]
    fn test_negated_check_fails_on_match() {
        let mut check = check(PeaksBelow::new(0.0), false);
        check.prepare(44_100.0, 1, 4).unwrap();

        let quiet = AudioBuffer::<f32>::new(1, 4);
        assert!(!check.evaluate(&quiet).unwrap());
    }

    #[test]
    fn test_call_names() {
        let assert_false = Check::new(Box::new(PeaksAt::<f32>::new(0.0)), AssertionLevel::Assert, false);
        assert_eq!(assert_false.call_name(), "assert_false()");
        assert_eq!(check(PeaksAt::new(0.0), true).call_name(), "expect_true()");
    }
}

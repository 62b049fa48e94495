//! Per-test failure accumulator

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};

/// State handed to one test function
///
/// Borrows the session configuration and collects the messages of
/// expect-level failures, from test runs and from plain
/// [`expect_true`](TestContext::expect_true) calls alike. The registry
/// creates a fresh context per test case.
#[derive(Debug)]
pub struct TestContext<'a> {
    config: &'a HarnessConfig,
    failures: Vec<String>,
}

impl<'a> TestContext<'a> {
    pub fn new(config: &'a HarnessConfig) -> Self {
        Self {
            config,
            failures: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a HarnessConfig {
        self.config
    }

    /// Record an expect-level failure message
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Remove and return all recorded messages
    pub fn take_failures(&mut self) -> Vec<String> {
        std::mem::take(&mut self.failures)
    }

    /// `Err(ExpectationsFailed)` if anything was recorded
    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(HarnessError::ExpectationsFailed {
                messages: self.failures,
            })
        }
    }

    /// Record a failure unless `condition` holds; returns `condition`
    pub fn expect_true(&mut self, condition: bool, what: &str) -> bool {
        if !condition {
            self.record_failure(format!("expect_true() failed\nCondition: {}", what));
        }
        condition
    }

    /// Fail with [`HarnessError::AssertionFailed`] unless `condition` holds
    pub fn assert_true(&self, condition: bool, what: &str) -> Result<()> {
        if condition {
            Ok(())
        } else {
            Err(HarnessError::AssertionFailed {
                message: format!("assert_true() failed\nCondition: {}", what),
            })
        }
    }
}

//! Named test cases and the session runner

use super::context::TestContext;
use crate::config::HarnessConfig;
use crate::error::Result;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Signature of a test or generator function
pub type TestFn = fn(&mut TestContext<'_>) -> Result<()>;

/// Kind of registered case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    /// Checks behaviour, run by default
    Test,
    /// Writes reference data, run with `--generators`
    Generator,
}

/// A registered test function
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub tags: Vec<String>,
    pub kind: CaseKind,
    pub func: TestFn,
}

impl TestCase {
    fn is_selected_by(&self, config: &HarnessConfig) -> bool {
        let wanted_kind = if config.run_generators {
            CaseKind::Generator
        } else {
            CaseKind::Test
        };

        self.kind == wanted_kind
            && (config.tags.is_empty() || self.tags.iter().any(|t| config.tags.contains(t)))
    }
}

/// Outcome of one case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub name: String,
    pub passed: bool,
    /// Recorded expectation failures, then the returned error if any
    pub messages: Vec<String>,
}

/// Outcome of a whole session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseOutcome>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// Process exit status: 1 if any case failed, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        i32::from(self.failed > 0)
    }

    /// Save the summary as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Wrote run summary to {}", path.display());
        Ok(())
    }
}

/// Ordered collection of test cases
#[derive(Debug, Clone, Default)]
pub struct TestRegistry {
    cases: Vec<TestCase>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test
    ///
    /// # Arguments
    /// * `name` - Name shown in the report
    /// * `tags` - Tags in `[tag1][tag2]` form, may be empty
    /// * `func` - Test function
    pub fn add(&mut self, name: &str, tags: &str, func: TestFn) -> &mut Self {
        self.push(name, tags, CaseKind::Test, func)
    }

    /// Register a reference-data generator
    pub fn add_generator(&mut self, name: &str, tags: &str, func: TestFn) -> &mut Self {
        self.push(name, tags, CaseKind::Generator, func)
    }

    fn push(&mut self, name: &str, tags: &str, kind: CaseKind, func: TestFn) -> &mut Self {
        self.cases.push(TestCase {
            name: name.to_string(),
            tags: HarnessConfig::parse_tags(tags),
            kind,
            func,
        });
        self
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Cases that `config` selects, in run order
    pub fn selected(&self, config: &HarnessConfig) -> Vec<&TestCase> {
        let mut selected: Vec<&TestCase> = self
            .cases
            .iter()
            .filter(|case| case.is_selected_by(config))
            .collect();

        if config.shuffle {
            selected.shuffle(&mut StdRng::seed_from_u64(config.seed));
        }

        selected
    }

    /// Run all selected cases, reporting to stdout
    pub fn run_all(&self, config: &HarnessConfig) -> Result<RunSummary> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_all_with_output(config, &mut out)
    }

    /// Run all selected cases, reporting to `out`
    ///
    /// A case fails if it returns an error or records an expectation
    /// failure. Every case gets a fresh [`TestContext`].
    pub fn run_all_with_output(
        &self,
        config: &HarnessConfig,
        out: &mut impl Write,
    ) -> Result<RunSummary> {
        let selected = self.selected(config);
        let mut summary = RunSummary::default();

        for case in &selected {
            debug!("Running {}", case.name);

            let mut ctx = TestContext::new(config);
            let result = (case.func)(&mut ctx);

            let mut messages = ctx.take_failures();
            if let Err(e) = result {
                messages.push(e.to_string());
            }

            let passed = messages.is_empty();
            if passed {
                writeln!(out, "[   <3   ] {} passed", case.name)?;
                summary.passed += 1;
            } else {
                writeln!(out, "[  </3   ] {} failed", case.name)?;
                for message in &messages {
                    writeln!(out, "{}", message)?;
                }
                summary.failed += 1;
            }

            summary.cases.push(CaseOutcome {
                name: case.name.clone(),
                passed,
                messages,
            });
        }

        writeln!(out)?;
        writeln!(out, "[ PASSED ] {}/{}", summary.passed, summary.total())?;
        if summary.failed > 0 {
            writeln!(out, "[ FAILED ] {}/{}", summary.failed, summary.total())?;
        }

        info!(
            "{} of {} cases passed",
            summary.passed,
            summary.total()
        );
        Ok(summary)
    }
}

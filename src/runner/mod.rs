//! Test running
//!
//! [`AudioTestBuilder`] drives one effect through a block loop and
//! evaluates checks; [`TestRegistry`] runs named test functions, each with
//! its own [`TestContext`].

mod builder;
mod check;
mod context;
mod registry;
mod report;

pub use builder::{process_audio_with, AudioTestBuilder, RunReport, Save, MAX_CHANNELS};
pub use check::{AssertionLevel, Check, CheckScope};
pub use context::TestContext;
pub use registry::{CaseKind, CaseOutcome, RunSummary, TestCase, TestFn, TestRegistry};

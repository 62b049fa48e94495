//! Integration Tests
//!
//! End-to-end tests for test runs, persistence and the test registry.

#[path = "harness/common.rs"]
mod common;
#[path = "harness/persistence.rs"]
mod persistence;
#[path = "harness/properties.rs"]
mod properties;
#[path = "harness/registry.rs"]
mod registry;
#[path = "harness/scenarios.rs"]
mod scenarios;

//! Run configuration
//!
//! A [`HarnessConfig`] is built once (defaults, then an optional JSON file,
//! then command-line overrides) and handed by reference to the test registry
//! and to every run. Nothing in the crate reads configuration from global
//! state, so several configurations can coexist in one process.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Decimal places used when numbers are printed in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precision {
    /// Linear sample values
    pub linear: usize,
    /// Values in decibels
    pub db: usize,
    /// Values in seconds
    pub seconds: usize,
    /// Values in hertz
    pub hz: usize,
    /// Values in radians
    pub radians: usize,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            linear: 5,
            db: 2,
            seconds: 4,
            hz: 1,
            radians: 3,
        }
    }
}

impl Precision {
    pub fn lin(&self, value: f64) -> String {
        format!("{:.*}", self.linear, value)
    }

    pub fn db(&self, value: f64) -> String {
        format!("{:.*}", self.db, value)
    }

    pub fn sec(&self, value: f64) -> String {
        format!("{:.*}", self.seconds, value)
    }

    pub fn hz(&self, value: f64) -> String {
        format!("{:.*}", self.hz, value)
    }

    pub fn rad(&self, value: f64) -> String {
        format!("{:.*}", self.radians, value)
    }
}

/// Read-only settings for a whole test session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Root for relative input/output paths
    pub data_root: PathBuf,
    /// Seed for noise signals and for shuffling the test order
    pub seed: u64,
    /// Only run cases carrying one of these tags (all cases when empty)
    pub tags: Vec<String>,
    /// Run reference-data generators instead of tests
    pub run_generators: bool,
    /// Shuffle the test order
    pub shuffle: bool,
    /// Report formatting
    pub precision: Precision,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            seed: 0,
            tags: Vec::new(),
            run_generators: false,
            shuffle: false,
            precision: Precision::default(),
        }
    }
}

impl HarnessConfig {
    /// Load a configuration from a JSON file
    ///
    /// Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Resolve a path against the data root
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_root.join(path)
        }
    }

    /// Fail unless the data root points to an existing directory
    pub fn require_data_root(&self) -> Result<&Path> {
        if self.data_root.is_dir() {
            Ok(&self.data_root)
        } else {
            Err(HarnessError::configuration(format!(
                "Data root path {} is not a directory, set it with --data-root-path",
                self.data_root.display()
            )))
        }
    }

    /// Parse a tag filter in `[tag1][tag2]` form (plain comma or space
    /// separated lists are accepted too)
    pub fn parse_tags(text: &str) -> Vec<String> {
        text.split(|c: char| c == '[' || c == ']' || c == ',' || c.is_whitespace())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

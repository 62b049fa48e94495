//! CLI Module
//!
//! Command-line interface of the harness runner binary.

use crate::config::HarnessConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Offline test runner for audio effects
#[derive(Parser, Debug, Default)]
#[command(name = "dsp-harness")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Root directory for reference and output files
    #[arg(short = 'p', long = "data-root-path")]
    pub data_root_path: Option<PathBuf>,

    /// Seed for noise signals and test shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only run cases with one of these tags, e.g. "[gain][clip]"
    #[arg(long)]
    pub tags: Option<String>,

    /// Run reference-data generators instead of tests
    #[arg(long)]
    pub generators: bool,

    /// Shuffle the test order
    #[arg(long)]
    pub shuffle: bool,

    /// JSON configuration file, overridden by the other options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Decimal places for linear values
    #[arg(long)]
    pub lin_decimals: Option<usize>,

    /// Decimal places for dB values
    #[arg(long)]
    pub db_decimals: Option<usize>,

    /// Decimal places for seconds
    #[arg(long)]
    pub sec_decimals: Option<usize>,

    /// Decimal places for frequencies
    #[arg(long)]
    pub hz_decimals: Option<usize>,

    /// Decimal places for phases
    #[arg(long)]
    pub rad_decimals: Option<usize>,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the session configuration
    ///
    /// Starts from defaults or the `--config` file, then applies every
    /// option given on the command line.
    pub fn into_config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_json_file(path)?,
            None => HarnessConfig::default(),
        };

        if let Some(path) = &self.data_root_path {
            config.data_root = path.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(tags) = &self.tags {
            config.tags = HarnessConfig::parse_tags(tags);
        }
        if self.generators {
            config.run_generators = true;
        }
        if self.shuffle {
            config.shuffle = true;
        }

        let precision = &mut config.precision;
        if let Some(n) = self.lin_decimals {
            precision.linear = n;
        }
        if let Some(n) = self.db_decimals {
            precision.db = n;
        }
        if let Some(n) = self.sec_decimals {
            precision.seconds = n;
        }
        if let Some(n) = self.hz_decimals {
            precision.hz = n;
        }
        if let Some(n) = self.rad_decimals {
            precision.radians = n;
        }

        Ok(config)
    }
}

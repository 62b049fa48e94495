//! dsp-harness CLI
//!
//! Runs the built-in self-check suites.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use dsp_harness::cli::Cli;
use dsp_harness::suites::builtin_registry;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("dsp-harness v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.into_config().context("Failed to build configuration")?;
    let registry = builtin_registry();

    let summary = registry
        .run_all(&config)
        .context("Failed to run test cases")?;

    if let Some(path) = &cli.report {
        summary
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    std::process::exit(summary.exit_code());
}

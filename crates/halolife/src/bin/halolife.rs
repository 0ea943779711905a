//! `halolife`: run a toroidal Game of Life across a group of workers.
//!
//! **Usage:**
//! ```text
//! halolife [CONFIG_FILE] [GENERATIONS] [--workers N] [--final-only] [--quiet]
//! ```
//!
//! Frames go to stdout; logs go to stderr and are filtered with
//! `RUST_LOG` (default `warn`). Exits non-zero if any worker fails.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use halolife::prelude::*;

/// Simulate Conway's Game of Life on a torus split into row bands.
#[derive(Parser, Debug)]
#[command(name = "halolife", version, about)]
struct Cli {
    /// Initial configuration: `<height> <width>` then rows of '.' and '*'.
    #[arg(default_value = "glider.txt")]
    config_file: PathBuf,

    /// Number of generations to simulate.
    #[arg(default_value_t = 64)]
    generations: u64,

    /// Number of workers; must divide the grid height.
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Only gather and print the final generation.
    #[arg(long)]
    final_only: bool,

    /// Print nothing to stdout.
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = RunConfig {
        generations: cli.generations,
        gather: if cli.final_only {
            GatherPolicy::Final
        } else {
            GatherPolicy::EveryGeneration
        },
        ..RunConfig::default()
    };
    let renderer: Box<dyn Renderer + Send> = if cli.quiet {
        Box::new(NullRenderer)
    } else {
        Box::new(TextRenderer::stdout())
    };

    let path = cli.config_file.clone();
    let load = move || -> Result<Grid, FormatError> {
        let file = File::open(&path)?;
        read_grid(BufReader::new(file))
    };

    let report = run_local(&config, cli.workers, load, renderer).with_context(|| {
        format!(
            "simulating {} with {} workers",
            cli.config_file.display(),
            cli.workers
        )
    })?;

    let metrics = &report.metrics;
    info!(
        generations = report.generations,
        population = report.grid.population(),
        mean_step_us = metrics.mean_step_us(),
        mean_exchange_us = metrics.mean_exchange_us(),
        halo_bytes = metrics.halo_bytes,
        "run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["halolife"]).unwrap();
        assert_eq!(cli.config_file, PathBuf::from("glider.txt"));
        assert_eq!(cli.generations, 64);
        assert_eq!(cli.workers, 4);
        assert!(!cli.final_only);
        assert!(!cli.quiet);
    }

    #[test]
    fn positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "halolife",
            "demos/glider.txt",
            "10",
            "--workers",
            "2",
            "--final-only",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.config_file, PathBuf::from("demos/glider.txt"));
        assert_eq!(cli.generations, 10);
        assert_eq!(cli.workers, 2);
        assert!(cli.final_only);
        assert!(cli.quiet);
    }

    #[test]
    fn negative_generations_rejected() {
        assert!(Cli::try_parse_from(["halolife", "g.txt", "-3"]).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let cli = Cli::try_parse_from(["halolife", "/nonexistent/halolife.txt", "1", "-q"]).unwrap();
        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/halolife.txt"));
    }
}

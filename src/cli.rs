//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::core::graph::MemoryStore;
use crate::error::{InvalidArgument, RunError};
use crate::export::csv::WritePolicy;
use crate::ingest::probabilities::{DEFAULT_RMAT_PROBABILITIES, QuadrantProbabilities};
use crate::ingest::synthetic::GenerationRequest;
use crate::pipeline::{RunConfig, RunSummary, run_to_file};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "rmatgen",
    about = "Generate an R-MAT random graph, load it and append its edge list to a file."
)]
pub struct Cli {
    /// Number of entities; must be a power of two.
    pub entity_count: u64,

    /// Number of edge trials to generate.
    pub edge_count: u64,

    /// File the edge list is appended to.
    pub output: PathBuf,

    /// Seed for reproducible runs. Defaults to OS entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Quadrant probabilities `a,b,c,d`; must sum to 1.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_RMAT_PROBABILITIES.to_vec(),
    )]
    pub probabilities: Vec<f64>,

    /// What to do when an output line cannot be written.
    #[arg(long, value_enum, default_value_t = OnWriteError::Abort)]
    pub on_write_error: OnWriteError,

    /// Also print every written line to stdout.
    #[arg(long)]
    pub echo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnWriteError {
    /// Stop the run at the first failed line.
    Abort,
    /// Report failed lines and keep writing.
    Collect,
}

impl From<OnWriteError> for WritePolicy {
    fn from(value: OnWriteError) -> Self {
        match value {
            OnWriteError::Abort => WritePolicy::Abort,
            OnWriteError::Collect => WritePolicy::Collect,
        }
    }
}

impl Cli {
    pub fn run_config(&self) -> Result<RunConfig, InvalidArgument> {
        let probabilities = QuadrantProbabilities::try_from(self.probabilities.as_slice())?;
        Ok(RunConfig {
            request: GenerationRequest::new(self.entity_count, self.edge_count, probabilities)?,
            seed: self.seed,
            policy: self.on_write_error.into(),
        })
    }
}

/// Validates `cli` and runs the batch against an in-memory store.
pub fn run_cli(cli: &Cli) -> Result<RunSummary, RunError> {
    let cfg = cli.run_config()?;
    let mut store = MemoryStore::new(cfg.request.entity_count());
    run_to_file(&cfg, &mut store, &cli.output, cli.echo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["rmatgen", "1024", "5000", "out.csv"]).unwrap();

        assert_eq!(1024, cli.entity_count);
        assert_eq!(5000, cli.edge_count);
        assert_eq!(PathBuf::from("out.csv"), cli.output);
        assert_eq!(None, cli.seed);
        assert_eq!(DEFAULT_RMAT_PROBABILITIES.to_vec(), cli.probabilities);
        assert_eq!(OnWriteError::Abort, cli.on_write_error);
        assert!(!cli.echo);

        let cfg = cli.run_config().unwrap();
        assert_eq!(QuadrantProbabilities::default(), *cfg.request.probabilities());
        assert_eq!(WritePolicy::Abort, cfg.policy);
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "rmatgen",
            "4",
            "100",
            "out.csv",
            "--seed",
            "7",
            "--probabilities",
            "0.4,0.3,0.2,0.1",
            "--on-write-error",
            "collect",
            "--echo",
        ])
        .unwrap();

        let cfg = cli.run_config().unwrap();
        assert_eq!(Some(7), cfg.seed);
        assert_eq!(WritePolicy::Collect, cfg.policy);
        assert!(cli.echo);
        assert_eq!(
            (0.4, 0.3, 0.2, 0.1),
            cfg.request.probabilities().quadrant_probabilities()
        );
    }

    #[test]
    fn test_missing_positional_rejected() {
        assert!(Cli::try_parse_from(["rmatgen", "4", "100"]).is_err());
        assert!(Cli::try_parse_from(["rmatgen", "-4", "100", "out.csv"]).is_err());
    }

    #[test]
    fn test_invalid_request_fails_before_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("edges.csv");
        let cli = Cli::try_parse_from(["rmatgen", "6", "100", output.to_str().unwrap()]).unwrap();

        let err = run_cli(&cli).unwrap_err();

        assert!(matches!(
            err,
            RunError::InvalidArgument(InvalidArgument::EntitiesNotPowerOfTwo { entities: 6 })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_wrong_probability_count() {
        let cli =
            Cli::try_parse_from(["rmatgen", "4", "1", "o.csv", "--probabilities", "0.5,0.5"])
                .unwrap();
        assert_eq!(
            Err(InvalidArgument::ProbabilityCount { count: 2 }),
            cli.run_config().map(|_| ())
        );
    }

    #[test]
    fn test_run_cli_writes_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("edges.csv");
        let cli = Cli::try_parse_from([
            "rmatgen",
            "8",
            "64",
            output.to_str().unwrap(),
            "--seed",
            "3",
        ])
        .unwrap();

        let summary = run_cli(&cli).unwrap();

        assert_eq!(64, summary.report.lines_written);
        assert_eq!(64, fs::read_to_string(&output).unwrap().lines().count());
    }
}

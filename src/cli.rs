use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "refactor-audit")]
#[command(about = "Structural diff, complexity and coverage audit for code under refactor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare an original and a refactored tree and rank files by risk
    Audit {
        /// Root of the original version
        #[arg(long)]
        original: PathBuf,

        /// Root of the refactored version
        #[arg(long)]
        refactored: PathBuf,

        /// Coverage report (LCOV, or coverage.py JSON when the file ends in .json)
        #[arg(long = "coverage", visible_alias = "lcov")]
        coverage: Vec<PathBuf>,

        /// mypy text output
        #[arg(long)]
        mypy: Option<PathBuf>,

        /// ruff/flake8 output, concise text or ruff JSON
        #[arg(long)]
        lint: Option<PathBuf>,

        /// pydocstyle output
        #[arg(long)]
        docstrings: Option<PathBuf>,

        /// Test inventory JSON
        #[arg(long, conflicts_with = "tests")]
        test_inventory: Option<PathBuf>,

        /// Test directory to discover tests in by naming convention
        #[arg(long)]
        tests: Option<PathBuf>,

        /// Configuration file (defaults to the nearest .refactor-audit.toml)
        #[arg(long, env = "REFACTOR_AUDIT_CONFIG")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of top offenders to list (overrides the config file)
        #[arg(long)]
        top: Option<usize>,

        /// Glob of paths to skip, relative to each root
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Write a default .refactor-audit.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

/// Default filter directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_audit_arguments() {
        let cli = Cli::parse_from([
            "refactor-audit",
            "-vv",
            "audit",
            "--original",
            "before",
            "--refactored",
            "after",
            "--coverage",
            "unit.lcov",
            "--coverage",
            "coverage.json",
            "--format",
            "json",
            "--exclude",
            "**/migrations/*",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Audit {
                coverage,
                format,
                exclude,
                ..
            } => {
                assert_eq!(coverage.len(), 2);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(exclude, vec!["**/migrations/*"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_inventory_and_test_dir_conflict() {
        let result = Cli::try_parse_from([
            "refactor-audit",
            "audit",
            "--original",
            "a",
            "--refactored",
            "b",
            "--test-inventory",
            "inv.json",
            "--tests",
            "tests",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(5), "trace");
    }
}

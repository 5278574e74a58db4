use crate::config::{self, AuditConfig};
use crate::coverage::load_coverage_sources;
use crate::io::output::{create_writer, OutputFormat};
use crate::pipeline::{discover_modules, run_audit, AuditInputs, AuditReport};
use crate::reports::{docstrings, lint, mypy, ExternalReports};
use crate::testing::TestInventory;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Options of the `audit` command.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub original: PathBuf,
    pub refactored: PathBuf,
    pub coverage: Vec<PathBuf>,
    pub mypy: Option<PathBuf>,
    pub lint: Option<PathBuf>,
    pub docstrings: Option<PathBuf>,
    pub test_inventory: Option<PathBuf>,
    pub tests: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub top: Option<usize>,
    pub exclude: Vec<String>,
}

pub fn load_audit_config(options: &AuditOptions) -> Result<AuditConfig> {
    let mut config = match &options.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    if let Some(top) = options.top {
        config.output.top_offenders = top;
    }
    Ok(config)
}

pub fn load_inputs(options: &AuditOptions) -> Result<AuditInputs> {
    let modules = discover_modules(&options.original, &options.refactored, &options.exclude)?;
    let coverage = load_coverage_sources(&options.coverage);

    let reports = ExternalReports {
        mypy: options
            .mypy
            .as_deref()
            .map(mypy::parse_mypy_file)
            .transpose()
            .context("Failed to load mypy report")?,
        lint: options
            .lint
            .as_deref()
            .map(lint::parse_lint_file)
            .transpose()
            .context("Failed to load lint report")?,
        docstrings: options
            .docstrings
            .as_deref()
            .map(docstrings::parse_pydocstyle_file)
            .transpose()
            .context("Failed to load docstring report")?,
    };

    let tests = match (&options.test_inventory, &options.tests) {
        (Some(path), _) => Some(TestInventory::load(path)?),
        (None, Some(dir)) => Some(TestInventory::discover(dir)?),
        (None, None) => None,
    };

    Ok(AuditInputs {
        modules,
        coverage,
        reports,
        tests,
    })
}

pub fn write_report(report: &AuditReport, format: OutputFormat, output: Option<&PathBuf>) -> Result<()> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = create_writer(format, sink);
    writer.write_report(report)?;
    Ok(())
}

pub fn handle_audit(options: AuditOptions) -> Result<()> {
    // Configuration errors must surface before any file is read.
    let config = load_audit_config(&options)?;
    let inputs = load_inputs(&options)?;
    let report = run_audit(&inputs, &config)?;
    write_report(&report, options.format, options.output.as_ref())?;
    if let Some(path) = &options.output {
        tracing::info!("Report written to {}", path.display());
    }
    Ok(())
}

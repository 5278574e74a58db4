//! Audit pipeline.
//!
//! Fan-out/fan-in: every module pair is audited as an independent rayon
//! task against read-only shared state (the merged line-hit index, the
//! external reports resolved per module, the test inventory). Ranking and the run summary are
//! computed once all tasks have finished.
//!
//! ```text
//! ModuleSource ─► extract ─┬─► diff ──────────────┐
//!                          ├─► complexity ────────┤
//!                          └─► coverage ──────────┼─► merge ─► score
//!                     missing tests (diff + inv) ─┘
//! ```

pub mod discovery;
pub mod stage;

use crate::audit::AuditRecord;
use crate::common::ModuleResolver;
use crate::config::AuditConfig;
use crate::coverage::{CoverageCorrelator, CoverageSource};
use crate::errors::AuditResult;
use crate::priority::{summarize, top_offenders, RankedFile, RunSummary, SeverityScorer};
use crate::reports::ExternalReports;
use crate::testing::TestInventory;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use discovery::discover_modules;
pub use stage::{audit_module, StageContext};

/// One logical module. A side is `None` when the module does not exist in
/// that version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    pub path: PathBuf,
    pub original: Option<String>,
    pub refactored: Option<String>,
}

impl ModuleSource {
    pub fn new(
        path: impl Into<PathBuf>,
        original: Option<impl Into<String>>,
        refactored: Option<impl Into<String>>,
    ) -> Self {
        Self {
            path: path.into(),
            original: original.map(Into::into),
            refactored: refactored.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditInputs {
    pub modules: Vec<ModuleSource>,
    pub coverage: Vec<CoverageSource>,
    pub reports: ExternalReports,
    pub tests: Option<TestInventory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    pub coverage_sources: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub metadata: ReportMetadata,
    /// Keyed by module path.
    pub records: BTreeMap<PathBuf, AuditRecord>,
    pub top_offenders: Vec<RankedFile>,
    pub summary: RunSummary,
}

impl AuditReport {
    /// All scored records, ranked.
    pub fn ranked(&self) -> Vec<RankedFile> {
        crate::priority::rank(self.records.values())
    }
}

/// Audit every module of `inputs`.
///
/// Fails only on invalid configuration, before any module is touched.
/// Modules that do not parse become degraded records.
pub fn run_audit(inputs: &AuditInputs, config: &AuditConfig) -> AuditResult<AuditReport> {
    config.validate()?;

    let modules = ModuleResolver::new(inputs.modules.iter().map(|m| &m.path));
    let correlator = CoverageCorrelator::new(&inputs.coverage, &config.coverage, &modules);
    let issues = inputs.reports.resolve(&modules);
    let scorer = SeverityScorer::new(config);
    let ctx = StageContext {
        correlator: &correlator,
        scorer: &scorer,
        issues: &issues,
        tests: inputs.tests.as_ref(),
    };

    let records: BTreeMap<PathBuf, AuditRecord> = inputs
        .modules
        .par_iter()
        .map(|module| (module.path.clone(), audit_module(module, &ctx)))
        .collect();

    let top = top_offenders(records.values(), config.output.top_offenders);
    let summary = summarize(records.values(), config.thresholds.high_complexity);
    tracing::info!(
        files = summary.total_files,
        degraded = summary.degraded_files,
        methods = summary.total_methods,
        "Audit complete"
    );

    Ok(AuditReport {
        metadata: ReportMetadata {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            coverage_sources: inputs.coverage.len(),
        },
        records,
        top_offenders: top,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditStatus;
    use crate::errors::AuditError;
    use indoc::indoc;

    #[test]
    fn test_invalid_config_aborts_before_processing() {
        let mut config = AuditConfig::default();
        config.thresholds.high_complexity = 0;
        let inputs = AuditInputs {
            modules: vec![ModuleSource::new("m.py", Some("x = 1\n"), Some("x = 1\n"))],
            ..AuditInputs::default()
        };
        let err = run_audit(&inputs, &config).unwrap_err();
        assert!(matches!(err, AuditError::Configuration(_)));
    }

    #[test]
    fn test_parse_failure_degrades_only_that_file() {
        let inputs = AuditInputs {
            modules: vec![
                ModuleSource::new("bad.py", Some("def ok():\n    pass\n"), Some("def broken(:\n")),
                ModuleSource::new(
                    "good.py",
                    Some("def f():\n    return 1\n"),
                    Some(indoc! {"
                        def f():
                            return 1
                    "}),
                ),
            ],
            ..AuditInputs::default()
        };
        let report = run_audit(&inputs, &AuditConfig::default()).unwrap();
        assert!(matches!(
            report.records[&PathBuf::from("bad.py")].status,
            AuditStatus::ParseFailed { .. }
        ));
        assert_eq!(report.summary.degraded_files, 1);
        assert_eq!(report.top_offenders.len(), 1);
        assert_eq!(report.top_offenders[0].path, PathBuf::from("good.py"));
    }
}

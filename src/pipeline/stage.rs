//! The per-file stage: extraction, diff, complexity, coverage, test
//! correlation, merge and scoring for one module pair.

use super::ModuleSource;
use crate::audit::{merge, AuditRecord, MergeInputs, Side};
use crate::comparison::diff_models;
use crate::complexity::{analyze_model, ComplexityMap};
use crate::core::StructuralModel;
use crate::coverage::CoverageCorrelator;
use crate::errors::{AuditResult, MergeWarning};
use crate::extraction::{build_model, parse_python, ParsedSource};
use crate::priority::SeverityScorer;
use crate::reports::ModuleIssues;
use crate::testing::{find_missing_tests, TestInventory};
use std::path::Path;

/// Read-only state shared by every per-file task.
pub struct StageContext<'a> {
    pub correlator: &'a CoverageCorrelator,
    pub scorer: &'a SeverityScorer,
    pub issues: &'a ModuleIssues,
    pub tests: Option<&'a TestInventory>,
}

fn parse_side(path: &Path, source: Option<&str>) -> AuditResult<Option<ParsedSource>> {
    source.map(|text| parse_python(path, text)).transpose()
}

pub fn audit_module(module: &ModuleSource, ctx: &StageContext<'_>) -> AuditRecord {
    let path = module.path.as_path();
    tracing::debug!(file = %path.display(), "Auditing module");

    let original = match parse_side(path, module.original.as_deref()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("{e}");
            return AuditRecord::degraded(path, Side::Original, &e);
        }
    };
    let refactored = match parse_side(path, module.refactored.as_deref()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("{e}");
            return AuditRecord::degraded(path, Side::Refactored, &e);
        }
    };

    let model_of = |parsed: &Option<ParsedSource>| {
        parsed
            .as_ref()
            .map(build_model)
            .unwrap_or_else(|| StructuralModel::empty(path))
    };
    let original_model = model_of(&original);
    let refactored_model = model_of(&refactored);

    let diff = diff_models(&original_model, &refactored_model);
    let complexity = refactored
        .as_ref()
        .map(|parsed| analyze_model(parsed, &refactored_model))
        .unwrap_or_else(ComplexityMap::new);
    let executable_lines = refactored_model
        .all_functions()
        .map(|f| (f.qualified_name.clone(), f.executable_lines()))
        .collect();
    let coverage = ctx.correlator.correlate(path, &refactored_model);
    let missing_tests = find_missing_tests(path, &diff, ctx.tests, coverage.fallback);

    let warnings = refactored_model
        .duplicates
        .iter()
        .map(|d| MergeWarning::DuplicateDefinition {
            qualified_name: d.qualified_name.clone(),
            kept_line: d.kept_line,
        })
        .collect();

    let mut record = merge(MergeInputs {
        path: path.to_path_buf(),
        diff,
        complexity,
        executable_lines,
        coverage,
        issues: ctx.issues.for_file(path),
        missing_tests,
        warnings,
    });
    ctx.scorer.apply(&mut record);
    record
}

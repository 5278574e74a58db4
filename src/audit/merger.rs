use super::record::{AuditRecord, AuditStatus, ExternalCounts};
use crate::comparison::ModuleDiff;
use crate::complexity::ComplexityMap;
use crate::coverage::{CoverageRecord, FileCoverage};
use crate::errors::MergeWarning;
use crate::reports::FileIssues;
use crate::testing::MissingTest;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The per-file results joined into one `AuditRecord`.
#[derive(Debug, Clone, Default)]
pub struct MergeInputs {
    pub path: PathBuf,
    pub diff: ModuleDiff,
    pub complexity: ComplexityMap,
    /// Executable line count per qualified name, for methods the coverage
    /// records miss.
    pub executable_lines: BTreeMap<String, usize>,
    pub coverage: FileCoverage,
    pub issues: FileIssues,
    pub missing_tests: Vec<MissingTest>,
    /// Warnings raised before merging, e.g. duplicate definitions.
    pub warnings: Vec<MergeWarning>,
}

/// Join diff, complexity, coverage, external issues and missing tests.
///
/// The complexity map decides which methods exist. A method without a
/// coverage record gets a zero-coverage fallback record over its real
/// executable lines; a coverage record
/// for an unknown method is dropped with a warning.
pub fn merge(inputs: MergeInputs) -> AuditRecord {
    let MergeInputs {
        path,
        diff,
        complexity,
        executable_lines,
        coverage: file_coverage,
        issues,
        missing_tests,
        mut warnings,
    } = inputs;

    warnings.extend(file_coverage.warnings);
    let mut reported = file_coverage.records;
    let mut coverage = BTreeMap::new();

    for name in complexity.keys() {
        let record = reported.remove(name).unwrap_or_else(|| {
            CoverageRecord::fallback(executable_lines.get(name).copied().unwrap_or(0))
        });
        coverage.insert(name.clone(), record);
    }

    for name in reported.into_keys() {
        tracing::warn!(
            file = %path.display(),
            method = %name,
            "Coverage for unknown method dropped"
        );
        warnings.push(MergeWarning::UnknownMethodCoverage { method: name });
    }

    AuditRecord {
        counts: ExternalCounts::from_issues(&issues),
        path,
        status: AuditStatus::Measured,
        classes: diff.classes,
        functions: diff.functions,
        complexity,
        coverage,
        coverage_fallback: file_coverage.fallback,
        issues,
        missing_tests,
        warnings,
        severity: None,
    }
}

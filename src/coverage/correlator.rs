use super::index::{FileHits, LineHitIndex};
use super::{CoverageRecord, CoverageSource, FileCoverage};
use crate::common::ModuleResolver;
use crate::config::CoverageConfig;
use crate::core::{FunctionInfo, StructuralModel};
use crate::errors::MergeWarning;
use std::path::Path;

/// Attributes executed lines to method line ranges.
///
/// Holds the run's merged `LineHitIndex`; `correlate` takes `&self` and is
/// called concurrently from every per-file task.
#[derive(Debug, Clone, Default)]
pub struct CoverageCorrelator {
    index: LineHitIndex,
}

impl CoverageCorrelator {
    pub fn new(
        sources: &[CoverageSource],
        config: &CoverageConfig,
        modules: &ModuleResolver,
    ) -> Self {
        Self {
            index: LineHitIndex::build(sources, &config.strip_prefixes, modules),
        }
    }

    pub fn from_index(index: LineHitIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &LineHitIndex {
        &self.index
    }

    /// Coverage for every method and free function of `model`, looked up
    /// under the audited module path `path`. Falls back to zero coverage for all of them when no
    /// source references the file.
    pub fn correlate(&self, path: &Path, model: &StructuralModel) -> FileCoverage {
        match self.index.get(path) {
            Some(hits) => measure_file(model, hits),
            None => {
                tracing::debug!(file = %path.display(), "No coverage data, using fallback");
                FileCoverage {
                    fallback: true,
                    records: model
                        .all_functions()
                        .map(|f| (f.qualified_name.clone(), CoverageRecord::fallback(f.executable_lines())))
                        .collect(),
                    warnings: Vec::new(),
                }
            }
        }
    }
}

fn measure_file(model: &StructuralModel, hits: &FileHits) -> FileCoverage {
    let mut coverage = FileCoverage::default();

    for function in model.all_functions() {
        let record = measure_function(function, hits);
        if record.clamped {
            let reported_hits = hits.executed_in(function.start_line, function.end_line).count();
            tracing::warn!(
                file = %model.path.display(),
                method = %function.qualified_name,
                reported_hits,
                lines = record.lines,
                "Coverage exceeds executable lines, clamping"
            );
            coverage.warnings.push(MergeWarning::CoverageClamped {
                method: function.qualified_name.clone(),
                reported_hits,
                lines: record.lines,
            });
        }
        coverage.records.insert(function.qualified_name.clone(), record);
    }

    if model.line_count > 0 {
        let beyond = hits.executed.range(model.line_count + 1..).count();
        if beyond > 0 {
            tracing::warn!(
                file = %model.path.display(),
                count = beyond,
                "Executed lines past the end of the file"
            );
            coverage
                .warnings
                .push(MergeWarning::LinesBeyondEndOfFile { count: beyond });
        }
    }

    coverage
}

fn measure_function(function: &FunctionInfo, hits: &FileHits) -> CoverageRecord {
    let executed = hits.executed_in(function.start_line, function.end_line).count();
    let mut record = CoverageRecord::measured(executed, function.executable_lines());
    record.uncovered_lines = function
        .statement_lines
        .iter()
        .copied()
        .filter(|line| !hits.executed.contains(line))
        .collect();
    record
}

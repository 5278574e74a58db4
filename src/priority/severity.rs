//! Per-file severity score.
//!
//! ```text
//! score = w_mypy * mypy_errors
//!       + w_lint * lint_findings
//!       + w_complexity * max(avg_complexity - 1, 0)
//!       + w_coverage * (100 - avg_coverage) / 10
//! ```
//!
//! Complexity is measured above the straight-line baseline of 1, so a file
//! of straight-line, fully covered methods with no findings scores 0.
//! Unknown external counts score as 0.

use super::tiers::PriorityTier;
use crate::audit::AuditRecord;
use crate::config::{AuditConfig, SeverityWeights, TierThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityScore {
    pub score: f64,
    pub tier: PriorityTier,
    pub avg_complexity: f64,
    pub avg_coverage: f64,
    pub mypy_errors: usize,
    pub lint_findings: usize,
}

#[derive(Debug, Clone)]
pub struct SeverityScorer {
    weights: SeverityWeights,
    tiers: TierThresholds,
}

impl SeverityScorer {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            weights: config.scoring.clone(),
            tiers: config.tiers.clone(),
        }
    }

    pub fn score_values(
        &self,
        mypy_errors: usize,
        lint_findings: usize,
        avg_complexity: f64,
        avg_coverage: f64,
    ) -> SeverityScore {
        let complexity_excess = (avg_complexity - 1.0).max(0.0);
        let coverage_gap = (100.0 - avg_coverage.clamp(0.0, 100.0)) / 10.0;
        let score = self.weights.mypy * mypy_errors as f64
            + self.weights.lint * lint_findings as f64
            + self.weights.complexity * complexity_excess
            + self.weights.coverage * coverage_gap;

        SeverityScore {
            score,
            tier: PriorityTier::classify(score, &self.tiers),
            avg_complexity,
            avg_coverage,
            mypy_errors,
            lint_findings,
        }
    }

    pub fn score(&self, record: &AuditRecord) -> SeverityScore {
        self.score_values(
            record.counts.mypy.unwrap_or(0),
            record.counts.lint.unwrap_or(0),
            record.average_complexity(),
            record.average_coverage(),
        )
    }

    /// Attach a score to a measured record. Degraded records stay unscored.
    pub fn apply(&self, record: &mut AuditRecord) {
        if !record.is_degraded() {
            record.severity = Some(self.score(record));
        }
    }
}

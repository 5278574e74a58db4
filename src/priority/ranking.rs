use super::tiers::PriorityTier;
use crate::audit::AuditRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// One entry of the top-offenders list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFile {
    pub path: PathBuf,
    pub score: f64,
    pub tier: PriorityTier,
}

/// Scored records ordered by descending score, ties by ascending path.
/// Degraded and unscored records are left out.
pub fn rank<'a, I>(records: I) -> Vec<RankedFile>
where
    I: IntoIterator<Item = &'a AuditRecord>,
{
    let mut ranked: Vec<RankedFile> = records
        .into_iter()
        .filter(|r| !r.is_degraded())
        .filter_map(|r| {
            r.severity.as_ref().map(|s| RankedFile {
                path: r.path.clone(),
                score: s.score,
                tier: s.tier,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    ranked
}

pub fn top_offenders<'a, I>(records: I, limit: usize) -> Vec<RankedFile>
where
    I: IntoIterator<Item = &'a AuditRecord>,
{
    let mut ranked = rank(records);
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Run-wide statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_files: usize,
    pub degraded_files: usize,
    pub total_methods: usize,
    pub missing_tests: usize,
    pub high_complexity_methods: usize,
    /// Mean over all measured methods, 100 when there are none.
    pub average_coverage: f64,
    pub tiers: TierCounts,
}

pub fn summarize<'a, I>(records: I, high_complexity: u32) -> RunSummary
where
    I: IntoIterator<Item = &'a AuditRecord>,
{
    let mut summary = RunSummary::default();
    let mut coverage_sum = 0.0;
    let mut coverage_count = 0usize;

    for record in records {
        summary.total_files += 1;
        if record.is_degraded() {
            summary.degraded_files += 1;
            continue;
        }
        summary.total_methods += record.method_count();
        summary.missing_tests += record.missing_tests.len();
        summary.high_complexity_methods += record
            .complexity
            .values()
            .filter(|c| c.complexity >= high_complexity)
            .count();
        coverage_sum += record.coverage.values().map(|c| c.coverage).sum::<f64>();
        coverage_count += record.coverage.len();

        match record.severity.as_ref().map(|s| s.tier) {
            Some(PriorityTier::High) => summary.tiers.high += 1,
            Some(PriorityTier::Medium) => summary.tiers.medium += 1,
            Some(PriorityTier::Low) => summary.tiers.low += 1,
            None => {}
        }
    }

    summary.average_coverage = if coverage_count == 0 {
        100.0
    } else {
        coverage_sum / coverage_count as f64
    };
    summary
}

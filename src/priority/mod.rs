//! Severity scoring, tiers and ranking.

pub mod ranking;
pub mod severity;
pub mod tiers;

pub use ranking::{rank, summarize, top_offenders, RankedFile, RunSummary, TierCounts};
pub use severity::{SeverityScore, SeverityScorer};
pub use tiers::PriorityTier;

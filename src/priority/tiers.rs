//! Severity tiers for ranking refactor risk.

use crate::config::TierThresholds;
use serde::{Deserialize, Serialize};

/// Ordered from most to least severe, so sorting ascending puts High first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    /// Riskiest files, address before touching them further.
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn classify(score: f64, thresholds: &TierThresholds) -> Self {
        if score >= thresholds.high {
            PriorityTier::High
        } else if score >= thresholds.medium {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityTier::High => "High",
            PriorityTier::Medium => "Medium",
            PriorityTier::Low => "Low",
        }
    }

    pub fn all() -> [PriorityTier; 3] {
        [PriorityTier::High, PriorityTier::Medium, PriorityTier::Low]
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

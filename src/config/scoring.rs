//! Severity weights.
//!
//! `score = mypy*w1 + lint*w2 + complexity*w3 + coverage*w4`, see
//! `priority::severity` for how each factor is measured.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    /// Weight per mypy error.
    #[serde(default = "default_mypy_weight")]
    pub mypy: f64,

    /// Weight per lint finding.
    #[serde(default = "default_lint_weight")]
    pub lint: f64,

    /// Weight per point of average complexity above 1.
    #[serde(default = "default_complexity_weight")]
    pub complexity: f64,

    /// Weight per 10 points of missing average coverage.
    #[serde(default = "default_coverage_weight")]
    pub coverage: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            mypy: default_mypy_weight(),
            lint: default_lint_weight(),
            complexity: default_complexity_weight(),
            coverage: default_coverage_weight(),
        }
    }
}

impl SeverityWeights {
    pub fn is_valid_weight(weight: f64) -> bool {
        weight.is_finite() && weight >= 0.0
    }

    pub fn validate_weight(weight: f64, name: &str) -> Result<(), String> {
        if Self::is_valid_weight(weight) {
            Ok(())
        } else {
            Err(format!(
                "scoring.{name} weight must be a finite, non-negative number (got {weight})"
            ))
        }
    }

    /// Every invalid weight, not just the first.
    pub fn validate(&self) -> Vec<String> {
        [
            (self.mypy, "mypy"),
            (self.lint, "lint"),
            (self.complexity, "complexity"),
            (self.coverage, "coverage"),
        ]
        .into_iter()
        .filter_map(|(weight, name)| Self::validate_weight(weight, name).err())
        .collect()
    }
}

fn default_mypy_weight() -> f64 {
    1.0
}

fn default_lint_weight() -> f64 {
    0.5
}

fn default_complexity_weight() -> f64 {
    2.0
}

fn default_coverage_weight() -> f64 {
    2.0
}

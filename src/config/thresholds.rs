use serde::{Deserialize, Serialize};

/// Score boundaries between severity tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Scores at or above this are High.
    #[serde(default = "default_high")]
    pub high: f64,

    /// Scores at or above this (and below `high`) are Medium.
    #[serde(default = "default_medium")]
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
        }
    }
}

impl TierThresholds {
    /// Flags more files as High and Medium.
    pub fn strict() -> Self {
        Self {
            high: 20.0,
            medium: 10.0,
        }
    }

    pub fn lenient() -> Self {
        Self {
            high: 45.0,
            medium: 25.0,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.medium.is_finite() && self.medium > 0.0) {
            errors.push(format!("tiers.medium must be positive (got {})", self.medium));
        }
        if !(self.high.is_finite() && self.high > 0.0) {
            errors.push(format!("tiers.high must be positive (got {})", self.high));
        }
        if self.high < self.medium {
            errors.push(format!(
                "tiers.high ({}) must not be below tiers.medium ({})",
                self.high, self.medium
            ));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityThresholds {
    /// Methods at or above this complexity count as high-complexity in the
    /// run summary.
    #[serde(default = "default_high_complexity")]
    pub high_complexity: u32,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            high_complexity: default_high_complexity(),
        }
    }
}

impl ComplexityThresholds {
    pub fn validate(&self) -> Vec<String> {
        if self.high_complexity == 0 {
            vec!["thresholds.high_complexity must be at least 1".to_string()]
        } else {
            Vec::new()
        }
    }
}

fn default_high() -> f64 {
    30.0
}

fn default_medium() -> f64 {
    15.0
}

fn default_high_complexity() -> u32 {
    10
}

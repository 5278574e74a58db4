//! Run configuration.
//!
//! `AuditConfig` is an explicit value passed to the correlator and scorer
//! constructors. It is loaded from `.refactor-audit.toml`:
//!
//! ```toml
//! [scoring]
//! mypy = 1.0
//! lint = 0.5
//! complexity = 2.0
//! coverage = 2.0
//!
//! [tiers]
//! high = 30.0
//! medium = 15.0
//!
//! [thresholds]
//! high_complexity = 10
//!
//! [coverage]
//! strip_prefixes = ["/builds/ci/checkout"]
//!
//! [output]
//! top_offenders = 10
//! ```

pub mod loader;
pub mod scoring;
pub mod thresholds;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use loader::{load_config, load_config_from, CONFIG_FILE_NAME};
pub use scoring::SeverityWeights;
pub use thresholds::{ComplexityThresholds, TierThresholds};
pub use validation::validate_config;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub scoring: SeverityWeights,

    #[serde(default)]
    pub tiers: TierThresholds,

    #[serde(default)]
    pub thresholds: ComplexityThresholds,

    #[serde(default)]
    pub coverage: CoverageConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AuditConfig {
    pub fn validate(&self) -> crate::errors::AuditResult<()> {
        validate_config(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Prefixes removed from paths in coverage reports before matching,
    /// e.g. the CI checkout directory.
    #[serde(default)]
    pub strip_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_top_offenders")]
    pub top_offenders: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_offenders: default_top_offenders(),
        }
    }
}

fn default_top_offenders() -> usize {
    10
}

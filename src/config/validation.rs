//! Configuration validation.
//!
//! Collects every problem before failing so a user can fix the whole file in
//! one pass. Runs before any module is processed.

use super::AuditConfig;
use crate::errors::{AuditError, AuditResult};

pub fn validate_config(config: &AuditConfig) -> AuditResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuditError::config(errors.join("; ")))
    }
}

pub fn collect_errors(config: &AuditConfig) -> Vec<String> {
    let mut errors = config.scoring.validate();
    errors.extend(config.tiers.validate());
    errors.extend(config.thresholds.validate());
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SeverityWeights, TierThresholds};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AuditConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_reported() {
        let config = AuditConfig {
            scoring: SeverityWeights {
                lint: -0.5,
                ..SeverityWeights::default()
            },
            tiers: TierThresholds {
                high: 5.0,
                medium: 15.0,
            },
            ..AuditConfig::default()
        };
        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 2);

        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, AuditError::Configuration(_)));
        let message = err.to_string();
        assert!(message.contains("scoring.lint"));
        assert!(message.contains("tiers.high"));
    }
}

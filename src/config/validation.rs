//! Configuration validation with error accumulation.
//!
//! Every section is checked and all issues are collected, so a user fixing
//! `.rbi.toml` sees every problem in one run.

use std::fmt;

use super::core::{EngineConfig, ProbabilityConfig, RecalculationConfig};
use super::thresholds::RiskMatrixConfig;
use crate::errors::CalcError;
use crate::orchestrator::RecalculationTrigger;

/// Largest accepted debounce interval
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Largest accepted management systems factor
pub const MAX_MANAGEMENT_SYSTEMS_FACTOR: f64 = 10.0;

/// One validation failure with the dotted path of the offending field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn risk_matrix_issues(config: &RiskMatrixConfig) -> Vec<ConfigIssue> {
    match config.validate() {
        Ok(()) => Vec::new(),
        Err(message) => vec![ConfigIssue::new("risk_matrix", message)],
    }
}

fn probability_issues(config: &ProbabilityConfig) -> Vec<ConfigIssue> {
    let factor = config.management_systems_factor;
    if factor.is_finite() && factor > 0.0 && factor <= MAX_MANAGEMENT_SYSTEMS_FACTOR {
        Vec::new()
    } else {
        vec![ConfigIssue::new(
            "probability.management_systems_factor",
            format!(
                "must be in (0, {}], got {}",
                MAX_MANAGEMENT_SYSTEMS_FACTOR, factor
            ),
        )]
    }
}

fn recalculation_issues(config: &RecalculationConfig) -> Vec<ConfigIssue> {
    match config.trigger {
        RecalculationTrigger::OnFieldChange { debounce_ms } if debounce_ms > MAX_DEBOUNCE_MS => {
            vec![ConfigIssue::new(
                "recalculation.trigger.debounce_ms",
                format!("must be at most {} ms, got {}", MAX_DEBOUNCE_MS, debounce_ms),
            )]
        }
        _ => Vec::new(),
    }
}

fn parallel_issues(config: &EngineConfig) -> Vec<ConfigIssue> {
    match config.parallel.max_concurrency {
        Some(0) => vec![ConfigIssue::new(
            "parallel.max_concurrency",
            "must be at least 1",
        )],
        _ => Vec::new(),
    }
}

/// Every issue in the configuration, in section order.
pub fn collect_issues(config: &EngineConfig) -> Vec<ConfigIssue> {
    let mut issues = risk_matrix_issues(&config.risk_matrix);
    issues.extend(probability_issues(&config.probability));
    issues.extend(parallel_issues(config));
    issues.extend(recalculation_issues(&config.recalculation));
    issues
}

/// Validate the whole configuration, reporting all issues at once.
pub fn validate_config(config: &EngineConfig) -> Result<(), CalcError> {
    let issues = collect_issues(config);
    match issues.as_slice() {
        [] => Ok(()),
        [single] => Err(CalcError::config_with_field(
            single.message.clone(),
            single.field.clone(),
        )),
        many => Err(CalcError::config(
            many.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

/// Replace each invalid section with its default, warning once per section.
pub fn sanitize_config(mut config: EngineConfig) -> EngineConfig {
    for issue in risk_matrix_issues(&config.risk_matrix) {
        eprintln!("Warning: Invalid {}. Using defaults.", issue);
        config.risk_matrix = RiskMatrixConfig::default();
    }
    for issue in probability_issues(&config.probability) {
        eprintln!("Warning: Invalid {}. Using defaults.", issue);
        config.probability = ProbabilityConfig::default();
    }
    for issue in parallel_issues(&config) {
        eprintln!("Warning: Invalid {}. Using defaults.", issue);
        config.parallel.max_concurrency = None;
    }
    for issue in recalculation_issues(&config.recalculation) {
        eprintln!("Warning: Invalid {}. Using defaults.", issue);
        config.recalculation = RecalculationConfig::default();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&EngineConfig::default()).is_ok());
        assert!(collect_issues(&EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_all_issues_are_accumulated() {
        let mut config = EngineConfig::default();
        config.risk_matrix.area_thresholds_m2 = vec![1.0, 2.0];
        config.probability.management_systems_factor = 11.0;
        config.recalculation.trigger = RecalculationTrigger::OnFieldChange {
            debounce_ms: 120_000,
        };

        let issues = collect_issues(&config);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[1].field, "probability.management_systems_factor");

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("risk_matrix"));
        assert!(message.contains("debounce_ms"));
    }

    #[test]
    fn test_single_issue_keeps_field() {
        let mut config = EngineConfig::default();
        config.parallel.max_concurrency = Some(0);
        match validate_config(&config) {
            Err(CalcError::Config { field, .. }) => {
                assert_eq!(field.as_deref(), Some("parallel.max_concurrency"))
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_sanitize_resets_only_invalid_sections() {
        let mut config = EngineConfig::default();
        config.probability.management_systems_factor = -1.0;
        config.recalculation.trigger = RecalculationTrigger::OnFieldChange { debounce_ms: 100 };

        let sanitized = sanitize_config(config);
        assert_eq!(sanitized.probability.management_systems_factor, 1.0);
        assert_eq!(
            sanitized.recalculation.trigger,
            RecalculationTrigger::OnFieldChange { debounce_ms: 100 }
        );
    }
}

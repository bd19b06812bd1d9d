//! Configuration structures. Every section is optional in `.rbi.toml`.

use serde::{Deserialize, Serialize};

use super::parallel::ParallelConfig;
use super::thresholds::RiskMatrixConfig;
use crate::core::ConsequencePolicy;
use crate::orchestrator::RecalculationTrigger;

/// Root configuration structure, read from `.rbi.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    /// PoF / CoF banding for the risk matrix
    #[serde(default)]
    pub risk_matrix: RiskMatrixConfig,

    /// Consequence settings
    #[serde(default)]
    pub consequence: ConsequenceConfig,

    /// Probability-of-failure settings
    #[serde(default)]
    pub probability: ProbabilityConfig,

    /// Parallel recalculation settings
    #[serde(default)]
    pub parallel: ParallelConfig,

    /// When recalculation runs
    #[serde(default)]
    pub recalculation: RecalculationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConsequenceConfig {
    /// Default governing-method policy; assets may override it
    #[serde(default)]
    pub policy: ConsequencePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbabilityConfig {
    /// Management systems factor applied to every PoF
    #[serde(default = "default_management_systems_factor")]
    pub management_systems_factor: f64,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            management_systems_factor: default_management_systems_factor(),
        }
    }
}

fn default_management_systems_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RecalculationConfig {
    #[serde(default)]
    pub trigger: RecalculationTrigger,
}

impl EngineConfig {
    /// Default configuration rendered as TOML, used by `rbi init`.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&EngineConfig::default())
    }
}

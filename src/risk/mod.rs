//! Risk-matrix combination.
//!
//! Damage factors reduce to a single PoF category by taking the worst
//! mechanism; the governing consequence is banded into a CoF category; the
//! pair indexes a fixed 5x5 matrix.

use crate::config::thresholds::band_index;
use crate::config::RiskMatrixConfig;
use crate::consequence::{ConsequenceResult, GoverningMethod};
use crate::core::MechanismKind;
use crate::damage::DamageFactor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Damage factor used when no mechanism applies to an asset.
pub const BASELINE_DAMAGE_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PofCategory {
    #[serde(rename = "1")]
    P1,
    #[serde(rename = "2")]
    P2,
    #[serde(rename = "3")]
    P3,
    #[serde(rename = "4")]
    P4,
    #[serde(rename = "5")]
    P5,
}

impl PofCategory {
    pub const ALL: [PofCategory; 5] = [
        PofCategory::P1,
        PofCategory::P2,
        PofCategory::P3,
        PofCategory::P4,
        PofCategory::P5,
    ];

    pub fn from_damage_factor(df: f64, config: &RiskMatrixConfig) -> Self {
        Self::ALL[band_index(df, &config.pof_thresholds)]
    }

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }
}

impl fmt::Display for PofCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CofCategory {
    A,
    B,
    C,
    D,
    E,
}

impl CofCategory {
    pub const ALL: [CofCategory; 5] = [
        CofCategory::A,
        CofCategory::B,
        CofCategory::C,
        CofCategory::D,
        CofCategory::E,
    ];

    pub fn from_area(area_m2: f64, config: &RiskMatrixConfig) -> Self {
        Self::ALL[band_index(area_m2, &config.area_thresholds_m2)]
    }

    pub fn from_financial(cost: f64, config: &RiskMatrixConfig) -> Self {
        Self::ALL[band_index(cost, &config.financial_thresholds)]
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CofCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Matrix cell, A lowest to E highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    A,
    B,
    C,
    D,
    E,
}

impl RiskCategory {
    pub fn level(&self) -> RiskLevel {
        match self {
            RiskCategory::A => RiskLevel::Low,
            RiskCategory::B | RiskCategory::C => RiskLevel::Medium,
            RiskCategory::D => RiskLevel::High,
            RiskCategory::E => RiskLevel::VeryHigh,
        }
    }

    /// Ordinal ranking, 1 (lowest) to 5.
    pub fn ranking(&self) -> u8 {
        *self as u8 + 1
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

/// Rows PoF 1..5, columns CoF A..E.
const RISK_MATRIX: [[RiskCategory; 5]; 5] = {
    use RiskCategory::*;
    [
        [A, A, B, C, C],
        [A, B, B, C, D],
        [B, B, C, D, D],
        [B, C, D, D, E],
        [C, D, D, E, E],
    ]
};

pub fn risk_category(pof: PofCategory, cof: CofCategory) -> RiskCategory {
    RISK_MATRIX[pof.index()][cof.index()]
}

/// Worst of the given categories, `None` when empty.
pub fn overall_pof_category(categories: impl IntoIterator<Item = PofCategory>) -> Option<PofCategory> {
    categories.into_iter().max()
}

/// Probability of failure formed from the active damage factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityOfFailure {
    /// Largest damage factor, or the baseline when no mechanism applies
    pub damage_factor: f64,
    pub governing_mechanism: Option<MechanismKind>,
    pub generic_failure_frequency: f64,
    pub management_systems_factor: f64,
    /// Failures per year
    pub value: f64,
    pub category: PofCategory,
}

/// Reduce damage factors to a PoF. The category is the worst per-mechanism
/// category, so one severe mechanism is never averaged away.
pub fn probability_of_failure(
    factors: &[DamageFactor],
    generic_failure_frequency: f64,
    management_systems_factor: f64,
    config: &RiskMatrixConfig,
) -> ProbabilityOfFailure {
    let governing = factors
        .iter()
        .max_by(|a, b| a.value.total_cmp(&b.value));
    let damage_factor = governing.map_or(BASELINE_DAMAGE_FACTOR, |f| f.value);
    let category = overall_pof_category(
        factors
            .iter()
            .map(|f| PofCategory::from_damage_factor(f.value, config)),
    )
    .unwrap_or_else(|| PofCategory::from_damage_factor(BASELINE_DAMAGE_FACTOR, config));

    ProbabilityOfFailure {
        damage_factor,
        governing_mechanism: governing.map(|f| f.mechanism),
        generic_failure_frequency,
        management_systems_factor,
        value: generic_failure_frequency * management_systems_factor * damage_factor,
        category,
    }
}

/// Combined PoF x CoF outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRating {
    pub pof_category: PofCategory,
    pub cof_category: CofCategory,
    pub risk_category: RiskCategory,
    pub risk_level: RiskLevel,
    pub risk_ranking: u8,
    /// m² per year
    pub area_risk: f64,
    /// Cost per year
    pub financial_risk: f64,
}

pub fn combine(pof: &ProbabilityOfFailure, consequence: &ConsequenceResult) -> RiskRating {
    let cof_category = consequence.governing_category;
    let category = risk_category(pof.category, cof_category);
    RiskRating {
        pof_category: pof.category,
        cof_category,
        risk_category: category,
        risk_level: category.level(),
        risk_ranking: category.ranking(),
        area_risk: pof.value * consequence.area_cof,
        financial_risk: pof.value * consequence.production_cof,
    }
}

/// CoF category of the governing method.
pub fn cof_category(method: GoverningMethod, area_m2: f64, cost: f64, config: &RiskMatrixConfig) -> CofCategory {
    match method {
        GoverningMethod::AreaBased => CofCategory::from_area(area_m2, config),
        GoverningMethod::ProductionBased => CofCategory::from_financial(cost, config),
    }
}

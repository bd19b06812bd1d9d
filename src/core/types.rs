//! Classification enums shared by the calculators.
//!
//! Every enum here is a closed set: calculators match on them exhaustively,
//! so adding a classification is a compile-time-checked change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Damage mechanisms the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKind {
    Thinning,
    ExternalCorrosion,
    ExternalClScc,
    InternalSccSohic,
    MechanicalFatigue,
    Cui,
}

impl MechanismKind {
    /// All mechanisms in evaluation (and reporting) order.
    pub const ALL: [MechanismKind; 6] = [
        MechanismKind::Thinning,
        MechanismKind::ExternalCorrosion,
        MechanismKind::ExternalClScc,
        MechanismKind::InternalSccSohic,
        MechanismKind::MechanicalFatigue,
        MechanismKind::Cui,
    ];

    /// Short label used in terminal output
    pub fn label(&self) -> &'static str {
        match self {
            MechanismKind::Thinning => "Thinning",
            MechanismKind::ExternalCorrosion => "External corrosion",
            MechanismKind::ExternalClScc => "External Cl-SCC",
            MechanismKind::InternalSccSohic => "Internal SCC/SOHIC",
            MechanismKind::MechanicalFatigue => "Mechanical fatigue",
            MechanismKind::Cui => "CUI",
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MechanismKind::Thinning => "thinning",
            MechanismKind::ExternalCorrosion => "external_corrosion",
            MechanismKind::ExternalClScc => "external_cl_scc",
            MechanismKind::InternalSccSohic => "internal_scc_sohic",
            MechanismKind::MechanicalFatigue => "mechanical_fatigue",
            MechanismKind::Cui => "cui",
        };
        write!(f, "{}", name)
    }
}

/// Inspection-coverage quality. A is a highly effective inspection, D a poorly
/// effective one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum DataConfidence {
    A,
    B,
    C,
    #[default]
    D,
}

/// Prior confidence in the corrosion-rate data used by the thinning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorConfidence {
    Low,
    Medium,
    High,
}

impl DataConfidence {
    pub const ALL: [DataConfidence; 4] = [
        DataConfidence::A,
        DataConfidence::B,
        DataConfidence::C,
        DataConfidence::D,
    ];

    /// Probability that an inspection of this class detects the true
    /// (least severe) damage state. Bounded to [0.4, 0.9].
    pub fn weight(&self) -> f64 {
        match self {
            DataConfidence::A => 0.9,
            DataConfidence::B => 0.7,
            DataConfidence::C => 0.5,
            DataConfidence::D => 0.4,
        }
    }

    pub fn prior_confidence(&self) -> PriorConfidence {
        match self {
            DataConfidence::A => PriorConfidence::High,
            DataConfidence::B => PriorConfidence::Medium,
            DataConfidence::C | DataConfidence::D => PriorConfidence::Low,
        }
    }

    /// Penalty applied to table-driven factors. Never below 1.0, so better
    /// data can only hold or lower a factor.
    pub fn uncertainty_factor(&self) -> f64 {
        1.0 + (DataConfidence::A.weight() - self.weight()) / 2.0
    }
}

impl fmt::Display for DataConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            DataConfidence::A => "A",
            DataConfidence::B => "B",
            DataConfidence::C => "C",
            DataConfidence::D => "D",
        };
        write!(f, "{}", letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    #[default]
    Pipe,
    Vessel,
    Tank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaterialFamily {
    #[default]
    CarbonSteel,
    LowAlloy,
    AusteniticStainless,
    Duplex,
    NickelAlloy,
}

impl MaterialFamily {
    /// External corrosion and CUI models apply to ferritic materials only.
    pub fn is_ferritic(&self) -> bool {
        matches!(self, MaterialFamily::CarbonSteel | MaterialFamily::LowAlloy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoatingQuality {
    #[default]
    None,
    Poor,
    Medium,
    High,
}

impl CoatingQuality {
    /// Expected coating life in years.
    pub fn life_years(&self) -> f64 {
        match self {
            CoatingQuality::None => 0.0,
            CoatingQuality::Poor => 5.0,
            CoatingQuality::Medium => 15.0,
            CoatingQuality::High => 20.0,
        }
    }
}

/// Atmospheric driver for external damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalEnvironment {
    Marine,
    Temperate,
    Arid,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsulationType {
    MineralWool,
    CalciumSilicate,
    Fiberglass,
    Perlite,
    FoamGlass,
    Unknown,
}

/// Three-level rating used for insulation complexity and condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    BelowAverage,
    Average,
    AboveAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiningType {
    StripLinedAlloy,
    Castable,
    Refractory,
    GlassLined,
    Organic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiningCondition {
    Poor,
    Average,
    Good,
}

/// Detection or isolation system rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum SystemRating {
    A,
    B,
    #[default]
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MitigationSystem {
    #[default]
    None,
    InventoryBlowdown,
    FireWaterDelugeAndMonitors,
    FireWaterMonitors,
    FoamSpray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FluidPhase {
    #[default]
    Liquid,
    Gas,
    TwoPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToxicityClass {
    #[default]
    NonToxic,
    Toxic,
    HighlyToxic,
}

/// Process corrosivity used when no measured corrosion rate exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corrosivity {
    Low,
    Moderate,
    High,
    Severe,
}

/// Internal thinning sub-variants. Each carries its own estimated-rate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThinningVariant {
    #[default]
    General,
    Localized,
    HydrochloricAcid,
    SulfuricAcid,
    HydrofluoricAcid,
    Caustic,
    Amine,
    SourWater,
    Co2,
    HighTemperatureSulfidic,
    FlowAssisted,
    OxygenatedWater,
}

impl ThinningVariant {
    /// Variants whose damage concentrates locally rather than uniformly.
    pub fn is_localized(&self) -> bool {
        matches!(
            self,
            ThinningVariant::Localized | ThinningVariant::FlowAssisted | ThinningVariant::SourWater
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OnlineMonitoring {
    #[default]
    None,
    Probes,
    Coupons,
    KeyProcessVariable,
}

impl OnlineMonitoring {
    pub fn factor(&self) -> f64 {
        match self {
            OnlineMonitoring::None => 1.0,
            OnlineMonitoring::Probes | OnlineMonitoring::Coupons => 2.0,
            OnlineMonitoring::KeyProcessVariable => 10.0,
        }
    }
}

/// Internal cracking sub-variants grouped under the SCC/SOHIC slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrackingVariant {
    SulfideStress,
    HicSohic,
    Caustic,
    Amine,
    Carbonate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmineSolution {
    Lean,
    Rich,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviousFailures {
    None,
    One,
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shaking {
    None,
    Minor,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShakingDuration {
    UnderTwoWeeks,
    TwoToThirteenWeeks,
    ThirteenToFiftyTwoWeeks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclicLoad {
    ReciprocatingMachinery,
    PrvChatter,
    HighPressureDropValve,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectiveAction {
    EngineeringModification,
    ExperienceBased,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeCondition {
    MissingOrDamagedSupports,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    ThreadedOrSocketWelded,
    SaddleIn,
    PipingTee,
    Weldolet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchDiameter {
    AllTwoNpsOrSmaller,
    LargerThanTwoNps,
}

/// How the governing consequence measure is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsequencePolicy {
    /// Use whichever method lands in the higher CoF category (ties go to area).
    #[default]
    LargerCategory,
    AreaOnly,
    FinancialOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_weights_are_bounded_and_ordered() {
        let weights: Vec<f64> = DataConfidence::ALL.iter().map(|c| c.weight()).collect();
        assert!(weights.iter().all(|w| *w > 0.0 && *w <= 1.0));
        assert!(weights.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_uncertainty_factor_never_rewards_worse_data() {
        assert_eq!(DataConfidence::A.uncertainty_factor(), 1.0);
        assert!(DataConfidence::B.uncertainty_factor() < DataConfidence::C.uncertainty_factor());
        assert!(DataConfidence::C.uncertainty_factor() < DataConfidence::D.uncertainty_factor());
    }

    #[test]
    fn test_mechanism_display_is_snake_case() {
        assert_eq!(MechanismKind::InternalSccSohic.to_string(), "internal_scc_sohic");
        let json = serde_json::to_string(&MechanismKind::ExternalClScc).unwrap();
        assert_eq!(json, "\"external_cl_scc\"");
    }
}

//! Damage-factor calculators, one per mechanism.
//!
//! Each calculator is a pure function of the asset snapshot, the inspection
//! confidence and the resolved design basis. A calculator either returns a
//! [`MechanismAssessment`] or a [`CalcError::UndefinedMechanismInput`] naming
//! the input it could not use; it never falls back to a zero factor.

pub mod bayes;
pub mod cui;
pub mod external;
pub mod fatigue;
pub mod scc;
pub mod thinning;

use crate::core::{AssetContext, CrackingVariant, DataConfidence, MechanismKind};
use crate::errors::CalcError;
use crate::material::DesignBasis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A computed damage factor for one mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageFactor {
    pub mechanism: MechanismKind,
    pub value: f64,
    /// The inputs the value was derived from.
    pub evidence: DamageEvidence,
    pub computed_at: DateTime<Utc>,
}

impl DamageFactor {
    pub fn from_assessment(
        mechanism: MechanismKind,
        assessment: MechanismAssessment,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mechanism,
            value: assessment.value,
            evidence: assessment.evidence,
            computed_at,
        }
    }

    /// Equality ignoring `computed_at`.
    pub fn same_value(&self, other: &DamageFactor) -> bool {
        self.mechanism == other.mechanism
            && self.value.to_bits() == other.value.to_bits()
            && self.evidence == other.evidence
    }
}

/// Calculator output before it is stamped with a mechanism and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MechanismAssessment {
    pub value: f64,
    pub evidence: DamageEvidence,
}

impl MechanismAssessment {
    pub(crate) fn new(value: f64, evidence: DamageEvidence) -> Self {
        Self {
            value: value.max(0.0),
            evidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DamageEvidence {
    Thinning(ThinningEvidence),
    /// Shared by external corrosion and CUI.
    WallLoss(WallLossEvidence),
    Cracking(CrackingEvidence),
    Fatigue(FatigueEvidence),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Measured,
    Entered,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinningEvidence {
    pub corrosion_rate_mm_y: f64,
    pub rate_source: RateSource,
    pub age_years: f64,
    pub reading_thickness_mm: f64,
    pub min_thickness_mm: f64,
    pub art: f64,
    pub strength_ratio: f64,
    pub posterior: [f64; 3],
    pub base_df: f64,
    /// Combined injection point / dead leg / monitoring multiplier.
    pub adjustment: f64,
    pub lining_df: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallLossEvidence {
    pub base_rate_mm_y: f64,
    pub corrosion_rate_mm_y: f64,
    pub exposure_years: f64,
    pub coating_credit_years: f64,
    pub reading_thickness_mm: f64,
    pub min_thickness_mm: f64,
    pub art: f64,
    pub strength_ratio: f64,
    pub posterior: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Susceptibility {
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackingEvidence {
    pub variant: Option<CrackingVariant>,
    pub susceptibility: Susceptibility,
    pub severity_index: u32,
    pub base_df: f64,
    pub age_years: f64,
    pub uncertainty_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueEvidence {
    pub previous_failures: f64,
    pub shaking: f64,
    pub cyclic_load: f64,
    pub base_df: f64,
    pub modifiers: f64,
    pub uncertainty_factor: f64,
}

/// One damage-mechanism model.
pub trait DamageCalculator: Sync {
    fn mechanism(&self) -> MechanismKind;

    fn calculate(
        &self,
        ctx: &AssetContext,
        confidence: DataConfidence,
        basis: &DesignBasis,
    ) -> Result<MechanismAssessment, CalcError>;
}

pub struct ThinningCalculator;
pub struct ExternalCorrosionCalculator;
pub struct ExternalClSccCalculator;
pub struct InternalSccCalculator;
pub struct FatigueCalculator;
pub struct CuiCalculator;

impl DamageCalculator for ThinningCalculator {
    fn mechanism(&self) -> MechanismKind {
        MechanismKind::Thinning
    }

    fn calculate(
        &self,
        ctx: &AssetContext,
        confidence: DataConfidence,
        basis: &DesignBasis,
    ) -> Result<MechanismAssessment, CalcError> {
        thinning::calculate(ctx, confidence, basis)
    }
}

impl DamageCalculator for ExternalCorrosionCalculator {
    fn mechanism(&self) -> MechanismKind {
        MechanismKind::ExternalCorrosion
    }

    fn calculate(
        &self,
        ctx: &AssetContext,
        confidence: DataConfidence,
        basis: &DesignBasis,
    ) -> Result<MechanismAssessment, CalcError> {
        external::calculate(ctx, confidence, basis)
    }
}

impl DamageCalculator for ExternalClSccCalculator {
    fn mechanism(&self) -> MechanismKind {
        MechanismKind::ExternalClScc
    }

    fn calculate(
        &self,
        ctx: &AssetContext,
        confidence: DataConfidence,
        _basis: &DesignBasis,
    ) -> Result<MechanismAssessment, CalcError> {
        scc::external_cl_scc(ctx, confidence)
    }
}

impl DamageCalculator for InternalSccCalculator {
    fn mechanism(&self) -> MechanismKind {
        MechanismKind::InternalSccSohic
    }

    fn calculate(
        &self,
        ctx: &AssetContext,
        confidence: DataConfidence,
        _basis: &DesignBasis,
    ) -> Result<MechanismAssessment, CalcError> {
        scc::internal_scc(ctx, confidence)
    }
}

impl DamageCalculator for FatigueCalculator {
    fn mechanism(&self) -> MechanismKind {
        MechanismKind::MechanicalFatigue
    }

    fn calculate(
        &self,
        ctx: &AssetContext,
        confidence: DataConfidence,
        _basis: &DesignBasis,
    ) -> Result<MechanismAssessment, CalcError> {
        fatigue::calculate(ctx, confidence)
    }
}

impl DamageCalculator for CuiCalculator {
    fn mechanism(&self) -> MechanismKind {
        MechanismKind::Cui
    }

    fn calculate(
        &self,
        ctx: &AssetContext,
        confidence: DataConfidence,
        basis: &DesignBasis,
    ) -> Result<MechanismAssessment, CalcError> {
        cui::calculate(ctx, confidence, basis)
    }
}

/// The calculator registered for a mechanism.
pub fn calculator_for(mechanism: MechanismKind) -> &'static dyn DamageCalculator {
    match mechanism {
        MechanismKind::Thinning => &ThinningCalculator,
        MechanismKind::ExternalCorrosion => &ExternalCorrosionCalculator,
        MechanismKind::ExternalClScc => &ExternalClSccCalculator,
        MechanismKind::InternalSccSohic => &InternalSccCalculator,
        MechanismKind::MechanicalFatigue => &FatigueCalculator,
        MechanismKind::Cui => &CuiCalculator,
    }
}

/// Piecewise-linear table lookup. Zero outside the tabulated span.
pub(crate) fn interpolate_rate(temperatures: &[f64], rates: &[f64], temperature_c: f64) -> f64 {
    debug_assert_eq!(temperatures.len(), rates.len());
    let (Some(first), Some(last)) = (temperatures.first(), temperatures.last()) else {
        return 0.0;
    };
    if !temperature_c.is_finite() || temperature_c < *first || temperature_c > *last {
        return 0.0;
    }

    temperatures
        .windows(2)
        .zip(rates.windows(2))
        .find(|(t, _)| temperature_c >= t[0] && temperature_c <= t[1])
        .map(|(t, r)| {
            if t[1] == t[0] {
                r[0]
            } else {
                r[0] + (temperature_c - t[0]) / (t[1] - t[0]) * (r[1] - r[0])
            }
        })
        .unwrap_or(rates[0])
}

/// Minimum thickness from the basis, or the named failure.
pub(crate) fn required_min_thickness(
    mechanism: MechanismKind,
    basis: &DesignBasis,
) -> Result<f64, CalcError> {
    match basis.min_thickness_mm {
        Some(tmin) if tmin.is_finite() && tmin > 0.0 => Ok(tmin),
        Some(tmin) => Err(CalcError::out_of_domain(
            mechanism,
            "minimum_thickness",
            format!("must be positive, got {}", tmin),
        )),
        None => Err(CalcError::missing(mechanism, "minimum_thickness")),
    }
}

pub(crate) fn required_reading_thickness(
    mechanism: MechanismKind,
    ctx: &AssetContext,
) -> Result<f64, CalcError> {
    let t_rdi = ctx.reading_thickness_mm();
    if t_rdi.is_finite() && t_rdi > 0.0 {
        Ok(t_rdi)
    } else {
        Err(CalcError::out_of_domain(
            mechanism,
            "reading_thickness",
            format!("must be positive, got {}", t_rdi),
        ))
    }
}

pub(crate) fn required_age(mechanism: MechanismKind, ctx: &AssetContext) -> Result<f64, CalcError> {
    ctx.age_since_inspection()
        .ok_or_else(|| CalcError::missing(mechanism, "last_inspection_date"))
}

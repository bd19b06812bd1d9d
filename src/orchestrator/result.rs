//! The assembled outcome of one recalculation.
//!
//! A result is always a whole snapshot. Mechanisms that failed are listed in
//! `exclusions` with their error and design-value problems in
//! `design_warnings`. A result with exclusions, or without a PoF or a
//! consequence, is partial.

use crate::consequence::ConsequenceResult;
use crate::core::{AssetId, ConsequencePolicy, MechanismKind};
use crate::damage::DamageFactor;
use crate::errors::CalcError;
use crate::material::DesignBasis;
use crate::risk::{ProbabilityOfFailure, RiskCategory, RiskLevel, RiskRating};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One slot per mechanism. Empty when the mechanism is inapplicable or
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MechanismSlots {
    pub thinning: Option<DamageFactor>,
    pub external_corrosion: Option<DamageFactor>,
    pub external_cl_scc: Option<DamageFactor>,
    pub internal_scc_sohic: Option<DamageFactor>,
    pub mechanical_fatigue: Option<DamageFactor>,
    pub cui: Option<DamageFactor>,
}

impl MechanismSlots {
    pub fn get(&self, mechanism: MechanismKind) -> Option<&DamageFactor> {
        self.slot(mechanism).as_ref()
    }

    fn slot(&self, mechanism: MechanismKind) -> &Option<DamageFactor> {
        match mechanism {
            MechanismKind::Thinning => &self.thinning,
            MechanismKind::ExternalCorrosion => &self.external_corrosion,
            MechanismKind::ExternalClScc => &self.external_cl_scc,
            MechanismKind::InternalSccSohic => &self.internal_scc_sohic,
            MechanismKind::MechanicalFatigue => &self.mechanical_fatigue,
            MechanismKind::Cui => &self.cui,
        }
    }

    /// Store a factor in the slot named by its mechanism.
    pub fn insert(&mut self, factor: DamageFactor) {
        let slot = match factor.mechanism {
            MechanismKind::Thinning => &mut self.thinning,
            MechanismKind::ExternalCorrosion => &mut self.external_corrosion,
            MechanismKind::ExternalClScc => &mut self.external_cl_scc,
            MechanismKind::InternalSccSohic => &mut self.internal_scc_sohic,
            MechanismKind::MechanicalFatigue => &mut self.mechanical_fatigue,
            MechanismKind::Cui => &mut self.cui,
        };
        *slot = Some(factor);
    }

    /// Filled slots in mechanism order.
    pub fn iter(&self) -> impl Iterator<Item = &DamageFactor> + '_ {
        MechanismKind::ALL
            .into_iter()
            .filter_map(move |mechanism| self.get(mechanism))
    }

    pub fn to_vec(&self) -> Vec<DamageFactor> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn same_values(&self, other: &MechanismSlots) -> bool {
        MechanismKind::ALL.into_iter().all(|mechanism| {
            match (self.get(mechanism), other.get(mechanism)) {
                (Some(a), Some(b)) => a.same_value(b),
                (None, None) => true,
                _ => false,
            }
        })
    }
}

/// An applicable mechanism that could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MechanismExclusion {
    pub mechanism: MechanismKind,
    pub error: CalcError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessmentResult {
    pub asset_id: AssetId,
    pub computed_at: DateTime<Utc>,
    pub design_basis: DesignBasis,
    /// Lookup misses and geometry failures met while resolving the basis
    pub design_warnings: Vec<CalcError>,
    pub damage_factors: MechanismSlots,
    pub exclusions: Vec<MechanismExclusion>,
    /// Absent when mechanisms applied but none could be computed
    pub pof: Option<ProbabilityOfFailure>,
    pub consequence_policy: ConsequencePolicy,
    pub consequence: Option<ConsequenceResult>,
    pub consequence_error: Option<CalcError>,
    /// Present only when both PoF and consequence are
    pub risk: Option<RiskRating>,
}

impl RiskAssessmentResult {
    /// Whether any part of the assessment was left out.
    pub fn is_partial(&self) -> bool {
        !self.exclusions.is_empty() || self.pof.is_none() || self.consequence.is_none()
    }

    pub fn risk_category(&self) -> Option<RiskCategory> {
        self.risk.as_ref().map(|r| r.risk_category)
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk.as_ref().map(|r| r.risk_level)
    }

    pub fn risk_ranking(&self) -> Option<u8> {
        self.risk.as_ref().map(|r| r.risk_ranking)
    }

    pub fn is_excluded(&self, mechanism: MechanismKind) -> bool {
        self.exclusions.iter().any(|e| e.mechanism == mechanism)
    }

    /// Equality ignoring every `computed_at` timestamp.
    pub fn same_assessment(&self, other: &RiskAssessmentResult) -> bool {
        self.asset_id == other.asset_id
            && self.design_basis == other.design_basis
            && self.design_warnings == other.design_warnings
            && self.damage_factors.same_values(&other.damage_factors)
            && self.exclusions == other.exclusions
            && self.pof == other.pof
            && self.consequence_policy == other.consequence_policy
            && self.consequence == other.consequence
            && self.consequence_error == other.consequence_error
            && self.risk == other.risk
    }
}

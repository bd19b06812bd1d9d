//! Consequence of failure: affected area and financial (production) loss.
//!
//! Both measures are computed independently from the same release profile;
//! the governing one is chosen per the asset's [`ConsequencePolicy`].

pub mod area;
pub mod fluid;
pub mod production;
pub mod release;

use crate::config::RiskMatrixConfig;
use crate::core::{AssetContext, ConsequencePolicy};
use crate::errors::CalcError;
use crate::risk::{cof_category, CofCategory};
use serde::{Deserialize, Serialize};

pub use area::AreaConsequence;
pub use production::FinancialConsequence;
pub use release::{GenericFailureFrequency, HoleSize, ReleaseProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoverningMethod {
    ProductionBased,
    AreaBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceResult {
    /// Financial consequence (currency units)
    pub production_cof: f64,
    /// Affected area (m²)
    pub area_cof: f64,
    pub governing_method: GoverningMethod,
    pub governing_category: CofCategory,
    pub area: AreaConsequence,
    pub financial: FinancialConsequence,
    pub release: ReleaseProfile,
}

/// Pick the governing method. `LargerCategory` compares the banded
/// categories; a tie goes to the area method.
pub fn select_governing(
    policy: ConsequencePolicy,
    area_m2: f64,
    cost: f64,
    config: &RiskMatrixConfig,
) -> (GoverningMethod, CofCategory) {
    let method = match policy {
        ConsequencePolicy::AreaOnly => GoverningMethod::AreaBased,
        ConsequencePolicy::FinancialOnly => GoverningMethod::ProductionBased,
        ConsequencePolicy::LargerCategory => {
            let by_area = CofCategory::from_area(area_m2, config);
            let by_cost = CofCategory::from_financial(cost, config);
            if by_cost > by_area {
                GoverningMethod::ProductionBased
            } else {
                GoverningMethod::AreaBased
            }
        }
    };
    (method, cof_category(method, area_m2, cost, config))
}

/// Full consequence evaluation for one asset.
pub fn evaluate(
    ctx: &AssetContext,
    policy: ConsequencePolicy,
    config: &RiskMatrixConfig,
) -> Result<ConsequenceResult, CalcError> {
    let fluid = fluid::properties(ctx.service.fluid);
    let release = release::release_profile(ctx, &fluid)?;
    let gff = GenericFailureFrequency::for_component(ctx.component);
    let area = area::area_consequence(ctx, &fluid, &release, &gff)?;
    let financial = production::financial_consequence(ctx, &fluid, &release, &gff, &area)?;

    let area_cof = area.area_cof();
    let production_cof = financial.total();
    let (governing_method, governing_category) =
        select_governing(policy, area_cof, production_cof, config);

    Ok(ConsequenceResult {
        production_cof,
        area_cof,
        governing_method,
        governing_category,
        area,
        financial,
        release,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::test_support::carbon_steel_pipe;

    #[test]
    fn test_tie_goes_to_area() {
        let config = RiskMatrixConfig::default();
        // both in band C
        let (method, category) =
            select_governing(ConsequencePolicy::LargerCategory, 500.0, 500_000.0, &config);
        assert_eq!(method, GoverningMethod::AreaBased);
        assert_eq!(category, CofCategory::C);
    }

    #[test]
    fn test_larger_category_wins() {
        let config = RiskMatrixConfig::default();
        let (method, category) =
            select_governing(ConsequencePolicy::LargerCategory, 5.0, 5_000_000.0, &config);
        assert_eq!(method, GoverningMethod::ProductionBased);
        assert_eq!(category, CofCategory::D);
    }

    #[test]
    fn test_explicit_policy_is_respected() {
        let config = RiskMatrixConfig::default();
        let (method, category) =
            select_governing(ConsequencePolicy::AreaOnly, 5.0, 5_000_000.0, &config);
        assert_eq!(method, GoverningMethod::AreaBased);
        assert_eq!(category, CofCategory::A);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let ctx = carbon_steel_pipe();
        let config = RiskMatrixConfig::default();
        let first = evaluate(&ctx, ConsequencePolicy::LargerCategory, &config).unwrap();
        let second = evaluate(&ctx, ConsequencePolicy::LargerCategory, &config).unwrap();
        assert_eq!(first, second);
        assert!(first.area_cof > 0.0);
        assert!(first.production_cof > 0.0);
    }

    #[test]
    fn test_invalid_diameter_fails() {
        let mut ctx = carbon_steel_pipe();
        ctx.design.internal_diameter_mm = 0.0;
        let err = evaluate(&ctx, ConsequencePolicy::AreaOnly, &RiskMatrixConfig::default())
            .unwrap_err();
        assert!(matches!(err, CalcError::UndefinedConsequenceInput { .. }));
    }
}

//! Affected-area consequence.

use super::fluid::FluidProperties;
use super::release::{GenericFailureFrequency, HoleSize, ReleaseProfile};
use crate::core::{AssetContext, MitigationSystem, SystemRating, ToxicityClass};
use crate::errors::CalcError;
use serde::{Deserialize, Serialize};

/// Area reduction from detection and isolation systems.
pub fn detection_isolation_factor(detection: SystemRating, isolation: SystemRating) -> f64 {
    use SystemRating::*;
    match (detection, isolation) {
        (A, A) => 0.25,
        (A, B) => 0.20,
        (A, C) | (B, C) => 0.10,
        (B, B) => 0.15,
        // Isolation better than detection gets the credit of the weaker system.
        (B, A) => 0.15,
        (C, _) => 0.0,
    }
}

pub fn mitigation_factor(system: MitigationSystem) -> f64 {
    match system {
        MitigationSystem::InventoryBlowdown => 0.25,
        MitigationSystem::FireWaterDelugeAndMonitors => 0.20,
        MitigationSystem::FoamSpray => 0.15,
        MitigationSystem::FireWaterMonitors => 0.05,
        MitigationSystem::None => 0.0,
    }
}

/// Toxic-area correlation `c · rate^d` on the toxic component rate.
fn toxic_correlation(class: ToxicityClass) -> Option<(f64, f64)> {
    match class {
        ToxicityClass::NonToxic => None,
        ToxicityClass::Toxic => Some((50.0, 0.9)),
        ToxicityClass::HighlyToxic => Some((300.0, 0.9)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaConsequence {
    /// Component damage flammable area after mitigation (m²)
    pub component_damage_m2: f64,
    /// Personnel injury flammable area after mitigation (m²)
    pub injury_flammable_m2: f64,
    /// Personnel injury toxic area after detection/isolation (m²)
    pub injury_toxic_m2: f64,
    pub detection_isolation_factor: f64,
    pub mitigation_factor: f64,
    /// Whether entered areas replaced the correlation for any term
    pub used_entered_areas: bool,
}

impl AreaConsequence {
    /// Governing area: the largest of the three.
    pub fn area_cof(&self) -> f64 {
        self.component_damage_m2
            .max(self.injury_flammable_m2)
            .max(self.injury_toxic_m2)
    }

    /// Injury area used by the financial model.
    pub fn injury_m2(&self) -> f64 {
        self.injury_flammable_m2.max(self.injury_toxic_m2)
    }
}

fn entered(value: Option<f64>, input: &str) -> Result<Option<f64>, CalcError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CalcError::consequence_input(
            input,
            format!("must be a non-negative area, got {}", v),
        )),
        other => Ok(other),
    }
}

pub fn area_consequence(
    ctx: &AssetContext,
    fluid: &FluidProperties,
    release: &ReleaseProfile,
    gff: &GenericFailureFrequency,
) -> Result<AreaConsequence, CalcError> {
    let service = &ctx.service;
    let protection = &ctx.protection;
    let entered_cmd = entered(service.ca_cmdflam, "ca_cmdflam")?;
    let entered_inj = entered(service.ca_injflam, "ca_injflam")?;
    let entered_tox = entered(service.ca_injtox, "ca_injtox")?;

    let toxic_fraction = service.toxic_mass_fraction;
    if !(0.0..=1.0).contains(&toxic_fraction) {
        return Err(CalcError::consequence_input(
            "toxic_mass_fraction",
            format!("must be within 0..=1, got {}", toxic_fraction),
        ));
    }

    let (cmd_correlated, inj_correlated) = match fluid.areas(release.gas_release) {
        Some(areas) => (
            gff.weighted(|hole: HoleSize| areas.component_damage.area(release.rate(hole))),
            gff.weighted(|hole: HoleSize| areas.injury.area(release.rate(hole))),
        ),
        None => (0.0, 0.0),
    };
    let cmd = entered_cmd.unwrap_or(cmd_correlated);
    let inj = entered_inj.unwrap_or(inj_correlated);
    let tox = match entered_tox {
        Some(area) => area,
        None => toxic_correlation(service.toxicity).map_or(0.0, |(c, d)| {
            gff.weighted(|hole| {
                let rate = release.rate(hole) * toxic_fraction;
                if rate <= 0.0 {
                    0.0
                } else {
                    c * rate.powf(d)
                }
            })
        }),
    };

    let fact_di = detection_isolation_factor(protection.detection, protection.isolation);
    let fact_mit = mitigation_factor(protection.mitigation);
    let flammable_reduction = (1.0 - fact_di) * (1.0 - fact_mit);

    Ok(AreaConsequence {
        component_damage_m2: cmd * flammable_reduction,
        injury_flammable_m2: inj * flammable_reduction,
        injury_toxic_m2: tox * (1.0 - fact_di),
        detection_isolation_factor: fact_di,
        mitigation_factor: fact_mit,
        used_entered_areas: entered_cmd.is_some() || entered_inj.is_some() || entered_tox.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consequence::fluid::properties;
    use crate::consequence::release::release_profile;
    use crate::core::{ComponentType, FluidPhase, RepresentativeFluid};
    use crate::damage::test_support::carbon_steel_pipe;

    fn evaluate(ctx: &AssetContext) -> AreaConsequence {
        let fluid = properties(ctx.service.fluid);
        let release = release_profile(ctx, &fluid).unwrap();
        let gff = GenericFailureFrequency::for_component(ComponentType::Pipe);
        area_consequence(ctx, &fluid, &release, &gff).unwrap()
    }

    #[test]
    fn test_detection_isolation_table() {
        assert_eq!(detection_isolation_factor(SystemRating::A, SystemRating::A), 0.25);
        assert_eq!(detection_isolation_factor(SystemRating::B, SystemRating::C), 0.10);
        assert_eq!(detection_isolation_factor(SystemRating::C, SystemRating::A), 0.0);
    }

    #[test]
    fn test_entered_areas_take_precedence() {
        let mut ctx = carbon_steel_pipe();
        ctx.service.ca_cmdflam = Some(120.0);
        ctx.service.ca_injflam = Some(300.0);
        let result = evaluate(&ctx);
        assert!(result.used_entered_areas);
        assert_eq!(result.component_damage_m2, 120.0);
        assert_eq!(result.area_cof(), 300.0);
    }

    #[test]
    fn test_mitigation_reduces_flammable_area() {
        let mut ctx = carbon_steel_pipe();
        let bare = evaluate(&ctx).area_cof();
        ctx.protection.detection = SystemRating::A;
        ctx.protection.isolation = SystemRating::A;
        ctx.protection.mitigation = MitigationSystem::InventoryBlowdown;
        let mitigated = evaluate(&ctx).area_cof();
        assert!(bare > 0.0);
        assert!((mitigated - bare * 0.75 * 0.75).abs() < 1e-9 * bare);
    }

    #[test]
    fn test_water_has_no_flammable_area() {
        let mut ctx = carbon_steel_pipe();
        ctx.service.fluid = RepresentativeFluid::Water;
        assert_eq!(evaluate(&ctx).area_cof(), 0.0);
    }

    #[test]
    fn test_toxic_release_adds_toxic_area() {
        let mut ctx = carbon_steel_pipe();
        ctx.service.fluid = RepresentativeFluid::H2S;
        ctx.service.phase = FluidPhase::Gas;
        ctx.service.toxicity = ToxicityClass::HighlyToxic;
        ctx.service.toxic_mass_fraction = 1.0;
        let result = evaluate(&ctx);
        assert!(result.injury_toxic_m2 > 0.0);
    }

    #[test]
    fn test_bad_toxic_fraction_is_rejected() {
        let mut ctx = carbon_steel_pipe();
        ctx.service.toxic_mass_fraction = 1.5;
        let fluid = properties(ctx.service.fluid);
        let release = release_profile(&ctx, &fluid).unwrap();
        let gff = GenericFailureFrequency::for_component(ComponentType::Pipe);
        assert!(area_consequence(&ctx, &fluid, &release, &gff).is_err());
    }
}

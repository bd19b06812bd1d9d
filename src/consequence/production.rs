//! Financial (production-loss) consequence.
//!
//! `FC = FC_cmd + FC_affa + FC_prod + FC_inj + FC_environ`

use super::area::AreaConsequence;
use super::fluid::FluidProperties;
use super::release::{GenericFailureFrequency, HoleSize, ReleaseProfile, RELEASE_DURATION_S};
use crate::core::{AssetContext, ComponentType};
use crate::errors::CalcError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialConsequence {
    pub component_damage_cost: f64,
    pub affected_area_cost: f64,
    pub production_loss_cost: f64,
    pub injury_cost: f64,
    pub environmental_cost: f64,
    pub evaporation_fraction: f64,
    /// Liquid left on the ground after evaporation (m³)
    pub spilled_volume_m3: f64,
}

impl FinancialConsequence {
    pub fn total(&self) -> f64 {
        self.component_damage_cost
            + self.affected_area_cost
            + self.production_loss_cost
            + self.injury_cost
            + self.environmental_cost
    }
}

/// Repair cost per hole size.
fn hole_cost(component: ComponentType, hole: HoleSize) -> f64 {
    let row: [f64; 4] = match component {
        ComponentType::Pipe => [5_000.0, 12_000.0, 20_000.0, 40_000.0],
        ComponentType::Vessel => [10_000.0, 20_000.0, 60_000.0, 100_000.0],
        ComponentType::Tank => [10_000.0, 20_000.0, 60_000.0, 120_000.0],
    };
    row[hole as usize]
}

/// Outage days per hole size.
fn outage_days(component: ComponentType, hole: HoleSize) -> f64 {
    let row: [f64; 4] = match component {
        ComponentType::Pipe => [1.0, 2.0, 3.0, 5.0],
        ComponentType::Vessel => [2.0, 3.0, 3.0, 10.0],
        ComponentType::Tank => [5.0, 10.0, 20.0, 50.0],
    };
    row[hole as usize]
}

fn non_negative(value: f64, input: &str) -> Result<f64, CalcError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::consequence_input(
            input,
            format!("must be a non-negative number, got {}", value),
        ))
    }
}

pub fn financial_consequence(
    ctx: &AssetContext,
    fluid: &FluidProperties,
    release: &ReleaseProfile,
    gff: &GenericFailureFrequency,
    area: &AreaConsequence,
) -> Result<FinancialConsequence, CalcError> {
    let costs = &ctx.financial;
    let material_factor = non_negative(costs.material_cost_factor, "material_cost_factor")?;
    let equipment_cost = non_negative(costs.equipment_cost_per_m2, "equipment_cost_per_m2")?;
    let outage_multiplier = non_negative(costs.outage_multiplier, "outage_multiplier")?;
    let production_cost = non_negative(costs.production_cost_per_day, "production_cost_per_day")?;
    let population = non_negative(costs.population_density, "population_density")?;
    let injury_unit_cost = non_negative(costs.injury_cost, "injury_cost")?;
    let environmental_unit_cost =
        non_negative(costs.environmental_cost_per_m3, "environmental_cost_per_m3")?;

    let evaporation_fraction = match ctx.service.evaporation_fraction {
        Some(f) if (0.0..=1.0).contains(&f) => f,
        Some(f) => {
            return Err(CalcError::consequence_input(
                "evaporation_fraction",
                format!("must be within 0..=1, got {}", f),
            ))
        }
        None => fluid.default_evaporation_fraction,
    };

    let component = ctx.component;
    let component_damage_cost = gff.weighted(|hole| hole_cost(component, hole)) * material_factor;
    let affected_area_cost = area.component_damage_m2 * equipment_cost;
    let production_loss_cost =
        gff.weighted(|hole| outage_days(component, hole)) * outage_multiplier * production_cost;
    let injury_cost = area.injury_m2() * population * injury_unit_cost;

    let spilled_volume_m3 = if release.gas_release {
        0.0
    } else {
        let inventory = ctx.service.inventory_mass_kg;
        let released_mass = gff.weighted(|hole| {
            let mass = release.rate(hole) * RELEASE_DURATION_S;
            inventory.map_or(mass, |limit| mass.min(limit))
        });
        released_mass * (1.0 - evaporation_fraction) / fluid.liquid_density
    };
    let environmental_cost = spilled_volume_m3 * environmental_unit_cost;

    Ok(FinancialConsequence {
        component_damage_cost,
        affected_area_cost,
        production_loss_cost,
        injury_cost,
        environmental_cost,
        evaporation_fraction,
        spilled_volume_m3,
    })
}

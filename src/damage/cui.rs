//! Corrosion under insulation for insulated ferritic components.
//!
//! Shares the coating credit and wall-loss model with external corrosion;
//! only the rate differs, scaled by insulation type, complexity and
//! condition.

use super::external::{support_factor, wall_loss_assessment};
use super::{interpolate_rate, MechanismAssessment};
use crate::core::{AssetContext, DataConfidence, ExternalEnvironment, InsulationType, MechanismKind, Rating};
use crate::errors::CalcError;
use crate::material::DesignBasis;

const MECHANISM: MechanismKind = MechanismKind::Cui;
const TEMPERATURES_C: [f64; 9] = [-12.0, -8.0, 6.0, 32.0, 71.0, 107.0, 135.0, 162.0, 176.0];

fn rate_row(environment: ExternalEnvironment) -> [f64; 9] {
    match environment {
        ExternalEnvironment::Marine => [0.0, 0.025, 0.127, 0.127, 0.254, 0.254, 0.254, 0.127, 0.025],
        ExternalEnvironment::Temperate => [0.0, 0.0, 0.076, 0.076, 0.127, 0.127, 0.051, 0.025, 0.0],
        ExternalEnvironment::Arid => [0.0, 0.0, 0.025, 0.025, 0.051, 0.051, 0.025, 0.0, 0.0],
        ExternalEnvironment::Severe => [0.0, 0.076, 0.254, 0.254, 0.508, 0.508, 0.254, 0.127, 0.025],
    }
}

pub fn base_rate(environment: ExternalEnvironment, operating_temperature_c: f64) -> f64 {
    interpolate_rate(&TEMPERATURES_C, &rate_row(environment), operating_temperature_c)
}

fn insulation_type_factor(insulation: InsulationType) -> f64 {
    match insulation {
        InsulationType::MineralWool
        | InsulationType::CalciumSilicate
        | InsulationType::Fiberglass
        | InsulationType::Unknown => 1.25,
        InsulationType::Perlite => 1.0,
        InsulationType::FoamGlass => 0.75,
    }
}

fn complexity_factor(complexity: Rating) -> f64 {
    match complexity {
        Rating::BelowAverage => 0.75,
        Rating::Average => 1.0,
        Rating::AboveAverage => 1.25,
    }
}

/// Insulation in good condition sheds water.
fn condition_factor(condition: Rating) -> f64 {
    match condition {
        Rating::AboveAverage => 0.75,
        Rating::Average => 1.0,
        Rating::BelowAverage => 1.25,
    }
}

pub fn calculate(
    ctx: &AssetContext,
    confidence: DataConfidence,
    basis: &DesignBasis,
) -> Result<MechanismAssessment, CalcError> {
    if !ctx.protection.insulated {
        return Err(CalcError::out_of_domain(
            MECHANISM,
            "insulated",
            "is false; CUI only applies to insulated components",
        ));
    }
    let protection = &ctx.protection;
    let environment = ctx
        .service
        .external_environment
        .ok_or_else(|| CalcError::missing(MECHANISM, "external_environment"))?;
    let insulation = protection
        .insulation_type
        .ok_or_else(|| CalcError::missing(MECHANISM, "insulation_type"))?;
    let complexity = protection
        .insulation_complexity
        .ok_or_else(|| CalcError::missing(MECHANISM, "insulation_complexity"))?;
    let condition = protection
        .insulation_condition
        .ok_or_else(|| CalcError::missing(MECHANISM, "insulation_condition"))?;

    let base = base_rate(environment, ctx.design.operating_temperature_c);
    let rate = base
        * insulation_type_factor(insulation)
        * complexity_factor(complexity)
        * condition_factor(condition)
        * support_factor(ctx);

    wall_loss_assessment(
        MECHANISM,
        ctx,
        confidence,
        basis,
        base,
        rate,
        &ctx.inspection.cui,
    )
}

//! External atmospheric corrosion of uninsulated ferritic components.
//!
//! Base rates are tabulated by operating temperature and environment and
//! interpolated linearly. A deficient pipe support or a soil/water
//! interface doubles the rate. Corrosion only starts once the coating's remaining life is
//! spent, so the exposure age is reduced by that credit.

use super::bayes;
use super::{
    interpolate_rate, required_age, required_min_thickness, required_reading_thickness,
    DamageEvidence, MechanismAssessment, WallLossEvidence,
};
use crate::core::{
    years_between, AssetContext, CoatingQuality, DataConfidence, ExternalEnvironment,
    InspectionCounts, MechanismKind,
};
use crate::errors::CalcError;
use crate::material::DesignBasis;

const MECHANISM: MechanismKind = MechanismKind::ExternalCorrosion;
const TEMPERATURES_C: [f64; 7] = [-12.0, -8.0, 6.0, 32.0, 71.0, 107.0, 121.0];
const SUPPORT_OR_INTERFACE_FACTOR: f64 = 2.0;

/// Base external corrosion rate (mm/y) at `TEMPERATURES_C`.
fn rate_row(environment: ExternalEnvironment) -> [f64; 7] {
    match environment {
        ExternalEnvironment::Marine => [0.0, 0.025, 0.127, 0.127, 0.025, 0.025, 0.0],
        ExternalEnvironment::Temperate => [0.0, 0.0, 0.076, 0.076, 0.025, 0.0, 0.0],
        ExternalEnvironment::Arid => [0.0, 0.0, 0.025, 0.025, 0.0, 0.0, 0.0],
        ExternalEnvironment::Severe => [0.0, 0.0, 0.254, 0.254, 0.051, 0.025, 0.0],
    }
}

pub fn base_rate(environment: ExternalEnvironment, operating_temperature_c: f64) -> f64 {
    interpolate_rate(&TEMPERATURES_C, &rate_row(environment), operating_temperature_c)
}

pub fn calculate(
    ctx: &AssetContext,
    confidence: DataConfidence,
    basis: &DesignBasis,
) -> Result<MechanismAssessment, CalcError> {
    let environment = ctx
        .service
        .external_environment
        .ok_or_else(|| CalcError::missing(MECHANISM, "external_environment"))?;
    let base = base_rate(environment, ctx.design.operating_temperature_c);
    let rate = base * support_factor(ctx);

    wall_loss_assessment(
        MECHANISM,
        ctx,
        confidence,
        basis,
        base,
        rate,
        &ctx.inspection.external,
    )
}

/// Pipe-support deficiency and soil/water interface don't stack.
pub(crate) fn support_factor(ctx: &AssetContext) -> f64 {
    if ctx.protection.support_deficiency || ctx.protection.soil_water_interface {
        SUPPORT_OR_INTERFACE_FACTOR
    } else {
        1.0
    }
}

/// Remaining coating life at the assessment date, in years.
pub(crate) fn coating_credit(mechanism: MechanismKind, ctx: &AssetContext) -> Result<f64, CalcError> {
    let coating = ctx.protection.coating;
    if coating == CoatingQuality::None {
        return Ok(0.0);
    }
    let installed = ctx
        .protection
        .coating_installed
        .or(ctx.design.in_service_date)
        .ok_or_else(|| CalcError::missing(mechanism, "coating_installed"))?;
    let coating_age = years_between(installed, ctx.assessment_date);
    Ok((coating.life_years() - coating_age).max(0.0))
}

/// Shared tail of the external corrosion and CUI models.
pub(crate) fn wall_loss_assessment(
    mechanism: MechanismKind,
    ctx: &AssetContext,
    confidence: DataConfidence,
    basis: &DesignBasis,
    base_rate_mm_y: f64,
    rate_mm_y: f64,
    counts: &InspectionCounts,
) -> Result<MechanismAssessment, CalcError> {
    let tmin = required_min_thickness(mechanism, basis)?;
    let t_rdi = required_reading_thickness(mechanism, ctx)?;
    let age = required_age(mechanism, ctx)?;
    let credit = coating_credit(mechanism, ctx)?;
    let exposure = (age - credit).max(0.0);

    let art = rate_mm_y * exposure / t_rdi;
    let sr = bayes::strength_ratio(tmin, t_rdi);
    let posterior = bayes::posterior(confidence.prior_confidence(), counts);
    let df = bayes::wall_loss_damage_factor(art, sr, &posterior);

    Ok(MechanismAssessment::new(
        df,
        DamageEvidence::WallLoss(WallLossEvidence {
            base_rate_mm_y,
            corrosion_rate_mm_y: rate_mm_y,
            exposure_years: exposure,
            coating_credit_years: credit,
            reading_thickness_mm: t_rdi,
            min_thickness_mm: tmin,
            art,
            strength_ratio: sr,
            posterior,
        }),
    ))
}

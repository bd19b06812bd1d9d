//! General and localized internal thinning.
//!
//! The corrosion rate comes from two thickness readings when they exist,
//! otherwise from an entered rate, otherwise from the service variant and
//! corrosivity. The wall-loss damage factor from [`super::bayes`] is then
//! scaled for injection points and dead legs, relaxed for online monitoring,
//! and capped by a lining damage factor when the component is lined.

use super::bayes;
use super::{
    required_age, required_min_thickness, required_reading_thickness, DamageEvidence,
    MechanismAssessment, RateSource, ThinningEvidence,
};
use crate::core::{
    years_between, AssetContext, Corrosivity, DataConfidence, LiningCondition, LiningType,
    MechanismKind, OnlineMonitoring, ThinningVariant,
};
use crate::errors::CalcError;
use crate::material::DesignBasis;

const MECHANISM: MechanismKind = MechanismKind::Thinning;
const LOCALIZED_RATE_FACTOR: f64 = 1.25;
const INJECTION_POINT_FACTOR: f64 = 3.0;
const DEAD_LEG_FACTOR: f64 = 3.0;
const LINING_MONITORING_FACTOR: f64 = 0.1;
pub const MIN_THINNING_DF: f64 = 0.1;

pub fn calculate(
    ctx: &AssetContext,
    confidence: DataConfidence,
    basis: &DesignBasis,
) -> Result<MechanismAssessment, CalcError> {
    let tmin = required_min_thickness(MECHANISM, basis)?;
    let t_rdi = required_reading_thickness(MECHANISM, ctx)?;
    let (rate, rate_source) = corrosion_rate(ctx)?;
    let age = required_age(MECHANISM, ctx)?;

    let art = rate * age / t_rdi;
    let sr = bayes::strength_ratio(tmin, t_rdi);
    let posterior = bayes::posterior(confidence.prior_confidence(), &ctx.inspection.thinning);
    let base_df = bayes::wall_loss_damage_factor(art, sr, &posterior);

    let adjustment = adjustment_factor(ctx);
    let mut df = base_df * adjustment;

    let lining_df = lining_damage_factor(ctx);
    if let Some(lining) = lining_df {
        df = df.min(lining);
    }

    Ok(MechanismAssessment::new(
        df.max(MIN_THINNING_DF),
        DamageEvidence::Thinning(ThinningEvidence {
            corrosion_rate_mm_y: rate,
            rate_source,
            age_years: age,
            reading_thickness_mm: t_rdi,
            min_thickness_mm: tmin,
            art,
            strength_ratio: sr,
            posterior,
            base_df,
            adjustment,
            lining_df,
        }),
    ))
}

/// Corrosion rate in mm/y: measured, then entered, then estimated from the
/// service variant and corrosivity.
pub fn corrosion_rate(ctx: &AssetContext) -> Result<(f64, RateSource), CalcError> {
    if let Some(rate) = measured_rate(ctx) {
        return Ok((rate, RateSource::Measured));
    }

    if let Some(rate) = ctx.service.estimated_corrosion_rate_mm_y {
        if !rate.is_finite() || rate < 0.0 {
            return Err(CalcError::out_of_domain(
                MECHANISM,
                "estimated_corrosion_rate",
                format!("must be a non-negative number, got {}", rate),
            ));
        }
        return Ok((rate, RateSource::Entered));
    }

    let variant = ctx.service.thinning_variant;
    let corrosivity = ctx
        .service
        .corrosivity
        .ok_or_else(|| CalcError::missing(MECHANISM, "corrosivity"))?;
    let mut rate = estimated_rate(variant, corrosivity);
    if variant.is_localized() {
        rate *= LOCALIZED_RATE_FACTOR;
    }
    Ok((rate, RateSource::Estimated))
}

/// `(t_nom - t_cur) / years(in_service -> last_inspection)`, clamped at zero.
fn measured_rate(ctx: &AssetContext) -> Option<f64> {
    let current = ctx.inspection.current_thickness_mm?;
    let start = ctx.design.in_service_date?;
    let inspected = ctx.inspection.last_inspection_date?;
    let years = years_between(start, inspected);
    if years <= 0.0 || !current.is_finite() {
        return None;
    }
    Some(((ctx.inspection.nominal_thickness_mm - current) / years).max(0.0))
}

/// Estimated base rates (mm/y) for Low / Moderate / High / Severe corrosivity.
pub fn estimated_rate(variant: ThinningVariant, corrosivity: Corrosivity) -> f64 {
    let row: [f64; 4] = match variant {
        ThinningVariant::General | ThinningVariant::Localized => [0.05, 0.13, 0.25, 0.50],
        ThinningVariant::HydrochloricAcid => [0.13, 0.50, 1.27, 2.54],
        ThinningVariant::SulfuricAcid => [0.08, 0.25, 0.76, 1.52],
        ThinningVariant::HydrofluoricAcid => [0.05, 0.25, 0.76, 1.27],
        ThinningVariant::Caustic => [0.03, 0.08, 0.25, 0.51],
        ThinningVariant::Amine => [0.03, 0.13, 0.38, 0.76],
        ThinningVariant::SourWater => [0.05, 0.25, 0.76, 1.52],
        ThinningVariant::Co2 => [0.10, 0.38, 1.02, 2.54],
        ThinningVariant::HighTemperatureSulfidic => [0.05, 0.25, 0.64, 1.27],
        ThinningVariant::FlowAssisted => [0.13, 0.38, 1.02, 2.03],
        ThinningVariant::OxygenatedWater => [0.05, 0.13, 0.38, 0.76],
    };
    match corrosivity {
        Corrosivity::Low => row[0],
        Corrosivity::Moderate => row[1],
        Corrosivity::High => row[2],
        Corrosivity::Severe => row[3],
    }
}

/// Injection point and dead leg multiply by 3 unless a highly effective
/// inspection was performed; online monitoring divides.
fn adjustment_factor(ctx: &AssetContext) -> f64 {
    let highly_effective = ctx.inspection.thinning.a > 0;
    let mut factor = 1.0;
    if ctx.service.injection_point && !highly_effective {
        factor *= INJECTION_POINT_FACTOR;
    }
    if ctx.service.dead_leg && !highly_effective {
        factor *= DEAD_LEG_FACTOR;
    }
    factor / ctx.service.online_monitoring.factor()
}

/// Lining damage factor. Only applies when type, condition and install date
/// are all known; an incomplete record gets no lining credit.
fn lining_damage_factor(ctx: &AssetContext) -> Option<f64> {
    let protection = &ctx.protection;
    let lining = protection.lining?;
    let condition = protection.lining_condition?;
    let installed = protection.lining_installed?;

    let age = years_between(installed, ctx.assessment_date);
    let band = match age {
        a if a <= 5.0 => 0,
        a if a <= 10.0 => 1,
        a if a <= 15.0 => 2,
        a if a <= 20.0 => 3,
        _ => 4,
    };
    let row: [f64; 5] = match lining {
        LiningType::StripLinedAlloy => [0.3, 1.0, 3.0, 10.0, 30.0],
        LiningType::Castable => [1.0, 3.0, 10.0, 30.0, 100.0],
        LiningType::Refractory => [0.3, 1.0, 3.0, 10.0, 30.0],
        LiningType::GlassLined => [3.0, 10.0, 30.0, 100.0, 300.0],
        LiningType::Organic => [10.0, 30.0, 100.0, 300.0, 1000.0],
    };
    let condition_factor = match condition {
        LiningCondition::Poor => 10.0,
        LiningCondition::Average => 2.0,
        LiningCondition::Good => 1.0,
    };
    let monitoring = match ctx.service.online_monitoring {
        OnlineMonitoring::None => 1.0,
        _ => LINING_MONITORING_FACTOR,
    };
    Some(row[band] * condition_factor * monitoring)
}

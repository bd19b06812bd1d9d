//! Stress corrosion cracking: external chloride SCC of austenitic stainless
//! steel and the internal SCC/SOHIC family.
//!
//! Both share the same shape: a susceptibility rating from environment and
//! material, mapped to a severity index (SVI), reduced by inspection history
//! through the SCC inspection table and escalated with time in service.

use super::{required_age, CrackingEvidence, DamageEvidence, MechanismAssessment, Susceptibility};
use crate::core::{
    AmineSolution, AssetContext, CrackingChemistry, CrackingVariant, DataConfidence,
    ExternalEnvironment, InspectionCounts, MaterialFamily, MechanismKind,
};
use crate::errors::CalcError;

pub const MAX_SCC_DF: f64 = 5000.0;
const AGE_EXPONENT: f64 = 1.1;

const SVI_ROWS: [u32; 7] = [1, 10, 50, 100, 500, 1000, 5000];

/// Base damage factor by SVI row; columns are no inspection, then one, two
/// and three inspections at D, C, B, A effectiveness.
const SCC_TABLE: [[f64; 13]; 7] = [
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [10.0, 8.0, 3.0, 1.0, 1.0, 6.0, 2.0, 1.0, 1.0, 4.0, 1.0, 1.0, 1.0],
    [50.0, 40.0, 17.0, 5.0, 3.0, 32.0, 10.0, 3.0, 1.0, 25.0, 5.0, 1.0, 1.0],
    [100.0, 80.0, 33.0, 10.0, 5.0, 64.0, 20.0, 5.0, 1.0, 50.0, 10.0, 2.0, 1.0],
    [500.0, 400.0, 170.0, 50.0, 25.0, 320.0, 100.0, 25.0, 5.0, 250.0, 50.0, 10.0, 5.0],
    [1000.0, 800.0, 330.0, 100.0, 50.0, 640.0, 200.0, 50.0, 10.0, 500.0, 100.0, 20.0, 10.0],
    [5000.0, 4000.0, 1670.0, 500.0, 250.0, 3200.0, 1000.0, 250.0, 50.0, 2500.0, 500.0, 100.0, 50.0],
];

/// Base DF before time escalation. Zero for a zero SVI.
pub fn scc_base_df(svi: u32, counts: &InspectionCounts) -> f64 {
    if svi == 0 {
        return 0.0;
    }
    // Smallest tabulated row at or above the SVI.
    let row = SVI_ROWS
        .iter()
        .position(|r| *r >= svi)
        .unwrap_or(SVI_ROWS.len() - 1);
    let column = match counts.best() {
        None => 0,
        Some((class, n)) => {
            let effectiveness = match class {
                DataConfidence::D => 0,
                DataConfidence::C => 1,
                DataConfidence::B => 2,
                DataConfidence::A => 3,
            };
            let repeats = n.clamp(1, 3) as usize - 1;
            1 + repeats * 4 + effectiveness
        }
    };
    SCC_TABLE[row][column]
}

fn escalate(base: f64, age_years: f64, confidence: DataConfidence) -> f64 {
    let aged = (base * age_years.max(1.0).powf(AGE_EXPONENT)).min(MAX_SCC_DF);
    aged * confidence.uncertainty_factor()
}

fn assess(
    mechanism: MechanismKind,
    ctx: &AssetContext,
    confidence: DataConfidence,
    variant: Option<CrackingVariant>,
    susceptibility: Susceptibility,
    svi: u32,
    counts: &InspectionCounts,
) -> Result<MechanismAssessment, CalcError> {
    let age = required_age(mechanism, ctx)?;
    let base_df = scc_base_df(svi, counts);
    let value = escalate(base_df, age, confidence);
    Ok(MechanismAssessment::new(
        value,
        DamageEvidence::Cracking(CrackingEvidence {
            variant,
            susceptibility,
            severity_index: svi,
            base_df,
            age_years: age,
            uncertainty_factor: confidence.uncertainty_factor(),
        }),
    ))
}

// ---------------------------------------------------------------------------
// External chloride SCC
// ---------------------------------------------------------------------------

pub fn cl_scc_susceptibility(environment: ExternalEnvironment, temperature_c: f64) -> Susceptibility {
    use ExternalEnvironment::*;
    use Susceptibility as S;
    match temperature_c {
        t if t < 38.0 => S::None,
        t if t < 66.0 => match environment {
            Marine | Severe => S::High,
            Temperate => S::Medium,
            Arid => S::Low,
        },
        t if t < 93.0 => match environment {
            Severe => S::High,
            Marine => S::Medium,
            Temperate | Arid => S::Low,
        },
        t if t <= 149.0 => match environment {
            Severe => S::Medium,
            Marine | Temperate => S::Low,
            Arid => S::None,
        },
        _ => S::None,
    }
}

fn cl_scc_svi(susceptibility: Susceptibility) -> u32 {
    match susceptibility {
        Susceptibility::High => 50,
        Susceptibility::Medium => 10,
        Susceptibility::Low => 1,
        Susceptibility::None => 0,
    }
}

pub fn external_cl_scc(
    ctx: &AssetContext,
    confidence: DataConfidence,
) -> Result<MechanismAssessment, CalcError> {
    const MECHANISM: MechanismKind = MechanismKind::ExternalClScc;
    if ctx.design.material_family != MaterialFamily::AusteniticStainless {
        return Err(CalcError::out_of_domain(
            MECHANISM,
            "material_family",
            "must be austenitic stainless steel",
        ));
    }
    let environment = ctx
        .service
        .external_environment
        .ok_or_else(|| CalcError::missing(MECHANISM, "external_environment"))?;
    let temperature = ctx.design.operating_temperature_c;
    if !temperature.is_finite() {
        return Err(CalcError::out_of_domain(
            MECHANISM,
            "operating_temperature",
            "is not a finite number",
        ));
    }

    let susceptibility = cl_scc_susceptibility(environment, temperature);
    assess(
        MECHANISM,
        ctx,
        confidence,
        None,
        susceptibility,
        cl_scc_svi(susceptibility),
        &ctx.inspection.external_cracking,
    )
}

// ---------------------------------------------------------------------------
// Internal SCC / SOHIC
// ---------------------------------------------------------------------------

const INTERNAL: MechanismKind = MechanismKind::InternalSccSohic;

/// Environmental severity of wet H2S service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnvironmentalSeverity {
    Low,
    Moderate,
    High,
}

pub fn environmental_severity(ph: f64, h2s_ppm: f64) -> EnvironmentalSeverity {
    use EnvironmentalSeverity::*;
    let column = match h2s_ppm {
        h if h < 50.0 => 0,
        h if h < 1_000.0 => 1,
        h if h <= 10_000.0 => 2,
        _ => 3,
    };
    let row: [EnvironmentalSeverity; 4] = match ph {
        p if p < 5.5 => [Low, Moderate, High, High],
        p if p < 7.6 => [Low, Low, Low, Moderate],
        p if p < 8.4 => [Low, Moderate, Moderate, Moderate],
        p if p < 9.0 => [Low, Moderate, Moderate, High],
        _ => [Low, Moderate, High, High],
    };
    row[column]
}

fn internal_svi(susceptibility: Susceptibility) -> u32 {
    match susceptibility {
        Susceptibility::High => 100,
        Susceptibility::Medium => 10,
        Susceptibility::Low => 1,
        Susceptibility::None => 0,
    }
}

fn chemistry(ctx: &AssetContext) -> Result<&CrackingChemistry, CalcError> {
    ctx.service
        .cracking
        .as_ref()
        .ok_or_else(|| CalcError::missing(INTERNAL, "cracking_chemistry"))
}

fn require(value: Option<f64>, input: &str) -> Result<f64, CalcError> {
    let value = value.ok_or_else(|| CalcError::missing(INTERNAL, input))?;
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::out_of_domain(
            INTERNAL,
            input,
            format!("must be a non-negative number, got {}", value),
        ));
    }
    Ok(value)
}

fn require_ph(chem: &CrackingChemistry) -> Result<f64, CalcError> {
    let ph = require(chem.ph, "ph")?;
    if ph > 14.0 {
        return Err(CalcError::out_of_domain(
            INTERNAL,
            "ph",
            format!("must be within 0..=14, got {}", ph),
        ));
    }
    Ok(ph)
}

fn sulfide_stress(ctx: &AssetContext, chem: &CrackingChemistry) -> Result<Susceptibility, CalcError> {
    use EnvironmentalSeverity as E;
    use Susceptibility as S;
    let severity = environmental_severity(require_ph(chem)?, require(chem.h2s_ppm, "h2s_ppm")?);
    let hardness = require(ctx.design.brinell_hardness, "brinell_hardness")?;
    let band = match hardness {
        h if h < 200.0 => 0,
        h if h <= 237.0 => 1,
        _ => 2,
    };
    Ok(match (ctx.design.pwht, band, severity) {
        (false, 0, _) => S::Low,
        (false, 1, E::High) => S::Medium,
        (false, 1, _) => S::Low,
        (false, _, E::High) => S::High,
        (false, _, E::Moderate) => S::Medium,
        (false, _, E::Low) => S::Low,
        (true, 0, _) => S::None,
        (true, 1, E::High) => S::Low,
        (true, 1, _) => S::None,
        (true, _, E::High) => S::Medium,
        (true, _, E::Moderate) => S::Low,
        (true, _, E::Low) => S::None,
    })
}

fn hic_sohic(ctx: &AssetContext, chem: &CrackingChemistry) -> Result<Susceptibility, CalcError> {
    use EnvironmentalSeverity as E;
    use Susceptibility as S;
    let severity = environmental_severity(require_ph(chem)?, require(chem.h2s_ppm, "h2s_ppm")?);
    let sulfur = require(ctx.design.steel_sulfur_wt_pct, "steel_sulfur_wt_pct")?;
    let as_welded = match (sulfur, severity) {
        (s, E::Low) if s > 0.01 => S::Medium,
        (s, _) if s > 0.01 => S::High,
        (s, E::High) if s >= 0.002 => S::High,
        (s, E::Moderate) if s >= 0.002 => S::Medium,
        (s, E::Low) if s >= 0.002 => S::Low,
        (_, E::High) => S::Medium,
        (_, _) => S::Low,
    };
    Ok(if ctx.design.pwht {
        one_level_lower(as_welded)
    } else {
        as_welded
    })
}

fn caustic(ctx: &AssetContext, chem: &CrackingChemistry) -> Result<Susceptibility, CalcError> {
    let concentration = require(chem.naoh_wt_pct, "naoh_wt_pct")?;
    if concentration > 100.0 {
        return Err(CalcError::out_of_domain(
            INTERNAL,
            "naoh_wt_pct",
            format!("must be within 0..=100, got {}", concentration),
        ));
    }
    if ctx.design.pwht {
        return Ok(Susceptibility::None);
    }
    // Cracking threshold falls from about 82 °C in dilute caustic to 46 °C at 50 wt%.
    let threshold = 82.0 - 0.72 * concentration.min(50.0);
    let temperature = ctx.design.operating_temperature_c;
    Ok(match temperature {
        t if t >= threshold => Susceptibility::High,
        t if t >= threshold - 15.0 => Susceptibility::Medium,
        _ => Susceptibility::Low,
    })
}

fn amine(ctx: &AssetContext, chem: &CrackingChemistry) -> Result<Susceptibility, CalcError> {
    let solution = chem
        .amine
        .ok_or_else(|| CalcError::missing(INTERNAL, "amine"))?;
    if ctx.design.pwht {
        return Ok(Susceptibility::None);
    }
    let temperature = ctx.design.operating_temperature_c;
    Ok(match (solution, temperature) {
        (AmineSolution::Lean, t) if t > 82.0 => Susceptibility::High,
        (AmineSolution::Lean, t) if t >= 38.0 => Susceptibility::Medium,
        (AmineSolution::Lean, _) => Susceptibility::Low,
        (AmineSolution::Rich, t) if t > 82.0 => Susceptibility::Medium,
        (AmineSolution::Rich, _) => Susceptibility::Low,
    })
}

fn carbonate(ctx: &AssetContext, chem: &CrackingChemistry) -> Result<Susceptibility, CalcError> {
    let ph = require_ph(chem)?;
    let co3 = require(chem.carbonate_ppm, "carbonate_ppm")?;
    if ctx.design.pwht {
        return Ok(Susceptibility::None);
    }
    Ok(match (ph, co3) {
        (p, c) if p >= 9.0 && c >= 400.0 => Susceptibility::High,
        (p, c) if (p >= 9.0 && c >= 100.0) || (p >= 8.0 && c >= 400.0) => Susceptibility::Medium,
        (p, _) if p >= 7.6 => Susceptibility::Low,
        _ => Susceptibility::None,
    })
}

fn one_level_lower(s: Susceptibility) -> Susceptibility {
    match s {
        Susceptibility::High => Susceptibility::Medium,
        Susceptibility::Medium => Susceptibility::Low,
        Susceptibility::Low | Susceptibility::None => Susceptibility::None,
    }
}

/// Susceptibility for the configured internal cracking variant.
pub fn internal_susceptibility(ctx: &AssetContext) -> Result<(CrackingVariant, Susceptibility), CalcError> {
    let chem = chemistry(ctx)?;
    let susceptibility = match chem.variant {
        CrackingVariant::SulfideStress => sulfide_stress(ctx, chem)?,
        CrackingVariant::HicSohic => hic_sohic(ctx, chem)?,
        CrackingVariant::Caustic => caustic(ctx, chem)?,
        CrackingVariant::Amine => amine(ctx, chem)?,
        CrackingVariant::Carbonate => carbonate(ctx, chem)?,
    };
    Ok((chem.variant, susceptibility))
}

pub fn internal_scc(
    ctx: &AssetContext,
    confidence: DataConfidence,
) -> Result<MechanismAssessment, CalcError> {
    let (variant, susceptibility) = internal_susceptibility(ctx)?;
    assess(
        INTERNAL,
        ctx,
        confidence,
        Some(variant),
        susceptibility,
        internal_svi(susceptibility),
        &ctx.inspection.cracking,
    )
}

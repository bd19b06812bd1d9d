//! Minimum required wall thickness from the thin-wall pressure relation.
//!
//! `tmin = P * D / (2 * S * E - P)`
//!
//! with P design pressure (MPa), D internal diameter (mm), S allowable stress
//! (MPa) and E weld joint efficiency, in mm. [`derive_min_thickness`] rounds
//! to three decimals to match stored thickness fields; the damage calculators
//! work from [`thin_wall_min_thickness`] so a small but valid requirement is
//! never rounded down to zero.

use crate::errors::CalcError;

const DISPLAY_DECIMALS: f64 = 1000.0;

/// Minimum thickness rounded for display and storage.
pub fn derive_min_thickness(
    design_pressure_mpa: f64,
    allowable_stress_mpa: f64,
    weld_efficiency: f64,
    internal_diameter_mm: f64,
) -> Result<f64, CalcError> {
    thin_wall_min_thickness(
        design_pressure_mpa,
        allowable_stress_mpa,
        weld_efficiency,
        internal_diameter_mm,
    )
    .map(round_thickness)
}

/// Unrounded minimum thickness, validated the same way.
pub fn thin_wall_min_thickness(
    design_pressure_mpa: f64,
    allowable_stress_mpa: f64,
    weld_efficiency: f64,
    internal_diameter_mm: f64,
) -> Result<f64, CalcError> {
    let inputs = [
        ("design_pressure", design_pressure_mpa),
        ("allowable_stress", allowable_stress_mpa),
        ("weld_efficiency", weld_efficiency),
        ("internal_diameter", internal_diameter_mm),
    ];
    if let Some((name, value)) = inputs.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
        return Err(CalcError::geometry(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    if weld_efficiency > 1.0 {
        return Err(CalcError::geometry(format!(
            "weld_efficiency must be in (0, 1], got {}",
            weld_efficiency
        )));
    }

    let denominator = 2.0 * allowable_stress_mpa * weld_efficiency - design_pressure_mpa;
    if denominator <= 0.0 {
        return Err(CalcError::geometry(format!(
            "2*S*E ({:.3}) must exceed design pressure ({:.3})",
            2.0 * allowable_stress_mpa * weld_efficiency,
            design_pressure_mpa
        )));
    }

    Ok(design_pressure_mpa * internal_diameter_mm / denominator)
}

pub fn round_thickness(value: f64) -> f64 {
    (value * DISPLAY_DECIMALS).round() / DISPLAY_DECIMALS
}
